//! In-memory implementations of the question-answering seams for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{
    AnswerModel, DocumentStore, LexicalSearch, QaError, Result, SemanticSearch,
};
use super::types::{Document, Metadata, RetrievalMode, RetrievalResult, FAQ_SOURCE, FUND_SOURCE};

pub fn faq_document(row: usize, question: &str, answer: &str) -> Document {
    Document {
        content: format!("Q: {}\nA: {}", question, answer),
        metadata: Metadata {
            source: Some(FAQ_SOURCE.to_string()),
            question: Some(question.to_string()),
            doc_id: Some(format!("faq_{}", row)),
            ..Default::default()
        },
    }
}

pub fn fund_document(
    row: usize,
    name: &str,
    category: &str,
    sharpe_ratio: Option<f64>,
    cagr: Option<f64>,
) -> Document {
    Document {
        content: format!("Fund: {}\nCategory: {}", name, category),
        metadata: Metadata {
            source: Some(FUND_SOURCE.to_string()),
            fund_id: Some(format!("F{:03}", row)),
            fund_name: Some(name.to_string()),
            category: Some(category.to_string()),
            sharpe_ratio,
            cagr,
            doc_id: Some(format!("fund_{}", row)),
            ..Default::default()
        },
    }
}

/// A hit with the given `doc_id` and content derived from it.
pub fn hit(mode: RetrievalMode, doc_id: &str) -> RetrievalResult {
    RetrievalResult {
        content: format!("content of {}", doc_id),
        metadata: Metadata {
            doc_id: Some(doc_id.to_string()),
            ..Default::default()
        },
        score: match mode {
            RetrievalMode::Semantic => Some(0.9),
            RetrievalMode::Lexical => None,
        },
        retrieval_mode: mode,
    }
}

pub fn fund_hit(
    mode: RetrievalMode,
    doc_id: &str,
    sharpe_ratio: Option<f64>,
    cagr: Option<f64>,
) -> RetrievalResult {
    let mut result = hit(mode, doc_id);
    result.metadata.source = Some(FUND_SOURCE.to_string());
    result.metadata.fund_name = Some(format!("Fund {}", doc_id));
    result.metadata.sharpe_ratio = sharpe_ratio;
    result.metadata.cagr = cagr;
    result
}

/// Mock search backend returning canned hits.
///
/// Semantic searches truncate to `top_k` like a vector index; lexical searches
/// return every canned hit and leave truncation to the caller.
#[derive(Clone)]
pub struct MockSearch {
    hits: Arc<Vec<RetrievalResult>>,
    failure: Option<String>,
    delay: Option<Duration>,
    call_count: Arc<AtomicUsize>,
}

impl MockSearch {
    pub fn returning(hits: Vec<RetrievalResult>) -> Self {
        Self {
            hits: Arc::new(hits),
            failure: None,
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn semantic(doc_ids: &[&str]) -> Self {
        Self::returning(
            doc_ids
                .iter()
                .map(|id| hit(RetrievalMode::Semantic, id))
                .collect(),
        )
    }

    pub fn lexical(doc_ids: &[&str]) -> Self {
        Self::returning(
            doc_ids
                .iter()
                .map(|id| hit(RetrievalMode::Lexical, id))
                .collect(),
        )
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::returning(vec![])
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    async fn respond(&self, limit: Option<usize>) -> std::result::Result<Vec<RetrievalResult>, String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(message.clone());
        }
        let hits = self.hits.iter().cloned();
        Ok(match limit {
            Some(limit) => hits.take(limit).collect(),
            None => hits.collect(),
        })
    }
}

#[async_trait]
impl SemanticSearch for MockSearch {
    async fn search(&self, _query: &str, top_k: usize) -> Result<Vec<RetrievalResult>> {
        self.respond(Some(top_k))
            .await
            .map_err(QaError::semantic_unavailable)
    }
}

#[async_trait]
impl LexicalSearch for MockSearch {
    async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<RetrievalResult>> {
        self.respond(None).await.map_err(QaError::lexical_unavailable)
    }
}

/// Mock answer model that records prompts.
#[derive(Clone)]
pub struct MockAnswerModel {
    answer: Arc<String>,
    failure: Option<String>,
    delay: Option<Duration>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockAnswerModel {
    pub fn returning(answer: &str) -> Self {
        Self {
            answer: Arc::new(answer.to_string()),
            failure: None,
            delay: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::returning("")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockAnswerModel {
    fn default() -> Self {
        Self::returning("mock answer")
    }
}

#[async_trait]
impl AnswerModel for MockAnswerModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(QaError::Synthesis(message.clone())),
            None => Ok(self.answer.to_string()),
        }
    }
}

/// Document store over a fixed list, counting loads.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    documents: Arc<Vec<Document>>,
    load_count: Arc<AtomicUsize>,
    failures_left: Arc<AtomicUsize>,
}

impl InMemoryDocumentStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(documents),
            load_count: Arc::new(AtomicUsize::new(0)),
            failures_left: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails the first `n` loads with a source error.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load_all_documents(&self) -> Result<Vec<Document>> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        // Give concurrent callers a chance to pile up on the build.
        tokio::task::yield_now().await;

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(QaError::Source("simulated load failure".into()));
        }
        Ok(self.documents.to_vec())
    }
}
