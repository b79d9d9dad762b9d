//! Trait definitions for the question-answering seams.
//!
//! Every external collaborator sits behind one of these traits so the engine
//! can be exercised with in-memory mocks.

use std::time::Duration;

use async_trait::async_trait;

use super::types::{AnswerPayload, Document, RetrievalMode, RetrievalResult, SearchMode};

/// Error type for question-answering operations.
#[derive(Debug, thiserror::Error)]
pub enum QaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No documents available to build lexical index")]
    EmptyCorpus,

    #[error("{backend} search backend unavailable: {message}")]
    BackendUnavailable {
        backend: RetrievalMode,
        message: String,
    },

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("Answer synthesis timed out after {}s", .0.as_secs())]
    SynthesisTimeout(Duration),

    #[error("Document source error: {0}")]
    Source(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl QaError {
    pub fn semantic_unavailable(message: impl Into<String>) -> Self {
        QaError::BackendUnavailable {
            backend: RetrievalMode::Semantic,
            message: message.into(),
        }
    }

    pub fn lexical_unavailable(message: impl Into<String>) -> Self {
        QaError::BackendUnavailable {
            backend: RetrievalMode::Lexical,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QaError>;

/// Yields the flat, ordered document corpus.
///
/// Every document must carry a stable `doc_id` in its metadata.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load_all_documents(&self) -> Result<Vec<Document>>;
}

/// Vector-similarity backend.
///
/// Hits are tagged [`RetrievalMode::Semantic`], at most `top_k` of them,
/// ordered by descending similarity.
#[async_trait]
pub trait SemanticSearch: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalResult>>;
}

/// Term-overlap backend. Hits are tagged [`RetrievalMode::Lexical`] and relevance-sorted.
#[async_trait]
pub trait LexicalSearch: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalResult>>;
}

/// Language model used for answer synthesis.
///
/// Treated as a slow, fallible remote call. Dropping the returned future cancels it.
#[async_trait]
pub trait AnswerModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Inbound port used by the HTTP layer.
#[async_trait]
pub trait QuestionAnswering: Send + Sync + 'static {
    /// Answers `question` from retrieved context.
    ///
    /// `top_k` of `None` uses the configured default; values are clamped to a valid range.
    async fn answer(
        &self,
        question: &str,
        top_k: Option<i64>,
        mode: SearchMode,
    ) -> Result<AnswerPayload>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify traits are object-safe (can be used as trait objects)
    fn _assert_store_object_safe(_: &dyn DocumentStore) {}
    fn _assert_semantic_object_safe(_: &dyn SemanticSearch) {}
    fn _assert_lexical_object_safe(_: &dyn LexicalSearch) {}
    fn _assert_model_object_safe(_: &dyn AnswerModel) {}
    fn _assert_answering_object_safe(_: &dyn QuestionAnswering) {}

    #[test]
    fn error_messages() {
        assert_eq!(
            QaError::semantic_unavailable("connection refused").to_string(),
            "semantic search backend unavailable: connection refused"
        );
        assert_eq!(
            QaError::SynthesisTimeout(Duration::from_secs(30)).to_string(),
            "Answer synthesis timed out after 30s"
        );
    }
}
