//! Assembly of the final answer payload.

use super::highlights::rank_highlights;
use super::types::{AnswerPayload, RetrievalResult, SearchMode};

/// Combines the model answer with the merged sources and ranked fund highlights.
///
/// `fund_highlights` is only set when at least one source is fund-sourced.
pub fn build_payload(
    mode: SearchMode,
    sources: Vec<RetrievalResult>,
    answer_text: &str,
) -> AnswerPayload {
    let highlights = rank_highlights(&sources);

    AnswerPayload {
        answer: answer_text.trim().to_string(),
        sources,
        retrieval_mode: mode,
        fund_highlights: (!highlights.is_empty()).then_some(highlights),
    }
}
