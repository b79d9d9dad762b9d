//! Question-answering service: retrieval, context composition, synthesis.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::context::{compose_context, render_prompt};
use super::payload::build_payload;
use super::retriever::HybridRetriever;
use super::traits::{
    AnswerModel, LexicalSearch, QaError, QuestionAnswering, Result, SemanticSearch,
};
use super::types::{AnswerPayload, SearchMode};

/// Configuration for the question-answering service.
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Number of sources used when the request does not say
    pub default_top_k: usize,
    /// Maximum number of sources allowed
    pub max_top_k: usize,
    /// Upper bound on the answer model round trip; `None` waits indefinitely
    pub synthesis_timeout: Option<Duration>,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            default_top_k: 3,
            max_top_k: 50,
            synthesis_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl QaConfig {
    /// Resolves a requested `top_k` into `1..=max_top_k`.
    pub fn resolve_top_k(&self, requested: Option<i64>) -> usize {
        let max = self.max_top_k.max(1);
        match requested {
            None => self.default_top_k.clamp(1, max),
            Some(k) if k < 1 => 1,
            Some(k) => usize::try_from(k).unwrap_or(max).min(max),
        }
    }
}

/// Answers questions from retrieved fund and FAQ passages.
///
/// # Type Parameters
///
/// * `S` - Semantic (vector) search backend
/// * `L` - Lexical (term-overlap) search backend
/// * `M` - Language model used to synthesize the answer
pub struct QaService<S, L, M>
where
    S: SemanticSearch,
    L: LexicalSearch,
    M: AnswerModel,
{
    retriever: HybridRetriever<S, L>,
    model: M,
    config: QaConfig,
}

impl<S, L, M> QaService<S, L, M>
where
    S: SemanticSearch,
    L: LexicalSearch,
    M: AnswerModel,
{
    pub fn new(semantic: S, lexical: L, model: M, config: QaConfig) -> Self {
        Self {
            retriever: HybridRetriever::new(semantic, lexical),
            model,
            config,
        }
    }

    #[allow(dead_code)]
    pub fn with_defaults(semantic: S, lexical: L, model: M) -> Self {
        Self::new(semantic, lexical, model, QaConfig::default())
    }

    async fn synthesize(&self, prompt: &str) -> Result<String> {
        match self.config.synthesis_timeout {
            Some(limit) => tokio::time::timeout(limit, self.model.generate(prompt))
                .await
                .map_err(|_| QaError::SynthesisTimeout(limit))?,
            None => self.model.generate(prompt).await,
        }
    }
}

#[async_trait]
impl<S, L, M> QuestionAnswering for QaService<S, L, M>
where
    S: SemanticSearch + 'static,
    L: LexicalSearch + 'static,
    M: AnswerModel + 'static,
{
    #[instrument(skip(self))]
    async fn answer(
        &self,
        question: &str,
        top_k: Option<i64>,
        mode: SearchMode,
    ) -> Result<AnswerPayload> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QaError::InvalidRequest("question must not be empty".into()));
        }

        let top_k = self.config.resolve_top_k(top_k);
        let results = self.retriever.retrieve(question, top_k, mode).await?;

        let context = compose_context(&results);
        let prompt = render_prompt(&context, question);
        let answer = self.synthesize(&prompt).await?;

        info!(top_k, sources = results.len(), "Question answered");
        Ok(build_payload(mode, results, &answer))
    }
}
