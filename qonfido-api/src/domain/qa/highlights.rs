//! Ranking of fund facts found among retrieved hits.

use std::cmp::Ordering;

use super::types::{FundHighlight, RetrievalResult};

/// Extracts a highlight from every fund-sourced hit, best first.
///
/// Order is by Sharpe ratio, then CAGR, both descending. A missing (or NaN)
/// value ranks below every real value; ties keep their input order.
pub fn rank_highlights(results: &[RetrievalResult]) -> Vec<FundHighlight> {
    let mut highlights: Vec<FundHighlight> =
        results.iter().filter_map(FundHighlight::from_result).collect();
    highlights.sort_by(|a, b| compare_rank(b, a));
    highlights
}

fn rank_value(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(f64::NEG_INFINITY)
}

fn compare_rank(a: &FundHighlight, b: &FundHighlight) -> Ordering {
    rank_value(a.sharpe_ratio)
        .total_cmp(&rank_value(b.sharpe_ratio))
        .then_with(|| rank_value(a.cagr).total_cmp(&rank_value(b.cagr)))
}
