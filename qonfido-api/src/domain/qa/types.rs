//! Core types for the question-answering domain.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Requested retrieval strategy for a question.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SearchMode {
    #[default]
    Semantic,
    Lexical,
    Hybrid,
}

impl SearchMode {
    /// Parses a mode name, case-insensitively. Unrecognized input falls back to `Semantic`.
    pub fn parse(input: &str) -> Self {
        input.trim().parse().unwrap_or_default()
    }
}

/// Backend that produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RetrievalMode {
    Semantic,
    Lexical,
}

/// Source tag of fund documents.
pub const FUND_SOURCE: &str = "fund";
/// Source tag of FAQ documents.
pub const FAQ_SOURCE: &str = "faq";

/// Provenance fields attached to a document.
///
/// Known fields are typed; anything else is kept verbatim in `extra`.
/// Serializes as one flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub fund_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub fund_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_f64")]
    pub sharpe_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_f64")]
    pub cagr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub doc_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn is_fund(&self) -> bool {
        self.source.as_deref() == Some(FUND_SOURCE)
    }

    /// Non-empty document id, if any.
    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Numeric `score` carried in the passthrough fields, if it parses.
    pub fn score(&self) -> Option<f64> {
        self.extra.get("score").and_then(value_as_f64)
    }

    /// All present fields as display pairs: typed fields first, then passthrough keys.
    pub fn entries(&self) -> Vec<(&str, String)> {
        let typed = [
            ("source", self.source.clone()),
            ("question", self.question.clone()),
            ("fund_id", self.fund_id.clone()),
            ("fund_name", self.fund_name.clone()),
            ("category", self.category.clone()),
            ("sharpe_ratio", self.sharpe_ratio.map(display_number)),
            ("cagr", self.cagr.map(display_number)),
            ("doc_id", self.doc_id.clone()),
        ];

        typed
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .chain(
                self.extra
                    .iter()
                    .map(|(key, value)| (key.as_str(), display_value(value))),
            )
            .collect()
    }
}

/// Keeps at least one decimal so `12.0` reads as it does in the dataset.
fn display_number(value: f64) -> String {
    format!("{:?}", value)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_as_f64))
}

/// A document yielded by a [`DocumentStore`](super::traits::DocumentStore).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub content: String,
    pub metadata: Metadata,
}

/// One retrieved passage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    pub content: String,
    pub metadata: Metadata,
    /// Backend-specific relevance; not comparable across backends. `None` when unknown.
    pub score: Option<f64>,
    pub retrieval_mode: RetrievalMode,
}

impl RetrievalResult {
    /// Key used to drop duplicate hits: the `doc_id`, or the raw content without one.
    pub fn dedup_key(&self) -> &str {
        self.metadata.doc_id().unwrap_or(&self.content)
    }
}

/// Ranked summary of a fund-sourced hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundHighlight {
    pub fund_name: Option<String>,
    pub category: Option<String>,
    pub sharpe_ratio: Option<f64>,
    pub cagr: Option<f64>,
    pub retrieval_mode: RetrievalMode,
    pub doc_id: Option<String>,
}

impl FundHighlight {
    /// Projects a hit into a highlight, or `None` if it is not fund-sourced.
    pub fn from_result(result: &RetrievalResult) -> Option<Self> {
        let metadata = &result.metadata;
        if !metadata.is_fund() {
            return None;
        }

        Some(Self {
            fund_name: metadata.fund_name.clone(),
            category: metadata.category.clone(),
            sharpe_ratio: metadata.sharpe_ratio,
            cagr: metadata.cagr,
            retrieval_mode: result.retrieval_mode,
            doc_id: metadata.doc_id.clone(),
        })
    }
}

/// Response for a single question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerPayload {
    pub answer: String,
    pub sources: Vec<RetrievalResult>,
    pub retrieval_mode: SearchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_highlights: Option<Vec<FundHighlight>>,
}
