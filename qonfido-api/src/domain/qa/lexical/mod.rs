//! Lexical search over the full document corpus.
//!
//! The index is built on first use and then shared read-only for the life of
//! the process. Concurrent first requests wait on a single build; a failed
//! build leaves nothing behind and is retried by the next request.

mod bm25;
mod tokenizer;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

pub use bm25::Bm25Index;

use super::traits::{DocumentStore, LexicalSearch, QaError, Result};
use super::types::{RetrievalMode, RetrievalResult};

/// Number of candidates the lexical backend returns per query.
pub const DEFAULT_LEXICAL_CANDIDATES: usize = 4;

/// [`LexicalSearch`] backed by a lazily built [`Bm25Index`].
pub struct LazyLexicalSearch<D: DocumentStore> {
    store: D,
    index: OnceCell<Bm25Index>,
    candidates: usize,
}

impl<D: DocumentStore> LazyLexicalSearch<D> {
    #[allow(dead_code)]
    pub fn new(store: D) -> Self {
        Self::with_candidates(store, DEFAULT_LEXICAL_CANDIDATES)
    }

    pub fn with_candidates(store: D, candidates: usize) -> Self {
        Self {
            store,
            index: OnceCell::new(),
            candidates: candidates.max(1),
        }
    }

    /// Returns the index, building it from the document store on first call.
    pub async fn index(&self) -> Result<&Bm25Index> {
        self.index
            .get_or_try_init(|| async {
                let documents = self.store.load_all_documents().await?;
                if documents.is_empty() {
                    return Err(QaError::EmptyCorpus);
                }

                let index = Bm25Index::build(documents);
                info!(documents = index.len(), "Lexical index built");
                Ok::<_, QaError>(index)
            })
            .await
    }

    #[allow(dead_code)]
    pub fn is_built(&self) -> bool {
        self.index.initialized()
    }
}

#[async_trait]
impl<D: DocumentStore> LexicalSearch for LazyLexicalSearch<D> {
    #[instrument(name = "lexical_search", skip(self))]
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalResult>> {
        let index = self.index().await?;

        let results: Vec<RetrievalResult> = index
            .top_n(query, self.candidates)
            .into_iter()
            .take(top_k)
            .map(|(document, _)| RetrievalResult {
                content: document.content.clone(),
                score: document.metadata.score(),
                metadata: document.metadata.clone(),
                retrieval_mode: RetrievalMode::Lexical,
            })
            .collect();

        debug!(hits = results.len(), "Lexical search completed");
        Ok(results)
    }
}
