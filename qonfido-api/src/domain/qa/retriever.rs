//! Retrieval merger: fans a query out to the configured backends and produces one
//! deduplicated, bounded result list.

use std::collections::HashSet;

use tracing::{debug, instrument};

use super::traits::{LexicalSearch, Result, SemanticSearch};
use super::types::{RetrievalResult, SearchMode};

/// Dispatches queries to a semantic and a lexical backend according to [`SearchMode`].
///
/// In hybrid mode both backends are queried concurrently, but semantic hits are
/// always placed before lexical hits. The merged list is then truncated, so
/// lexical hits only surface when semantic search yields fewer than `top_k`
/// unique hits.
pub struct HybridRetriever<S, L>
where
    S: SemanticSearch,
    L: LexicalSearch,
{
    semantic: S,
    lexical: L,
}

impl<S, L> HybridRetriever<S, L>
where
    S: SemanticSearch,
    L: LexicalSearch,
{
    pub fn new(semantic: S, lexical: L) -> Self {
        Self { semantic, lexical }
    }

    /// Retrieves at most `top_k` unique hits for `query`.
    ///
    /// Backend failures are propagated as-is.
    #[instrument(skip(self, mode), fields(mode = %mode))]
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        mode: SearchMode,
    ) -> Result<Vec<RetrievalResult>> {

        if top_k == 0 {
            return Ok(vec![]);
        }

        let hits = match mode {
            SearchMode::Semantic => SemanticSearch::search(&self.semantic, query, top_k).await?,
            SearchMode::Lexical => LexicalSearch::search(&self.lexical, query, top_k).await?,
            SearchMode::Hybrid => {
                let (mut semantic, lexical) = tokio::try_join!(
                    SemanticSearch::search(&self.semantic, query, top_k),
                    LexicalSearch::search(&self.lexical, query, top_k),
                )?;
                debug!(
                    semantic = semantic.len(),
                    lexical = lexical.len(),
                    "Merging hybrid hits"
                );
                semantic.extend(lexical);
                semantic
            }
        };

        Ok(merge(hits, top_k))
    }
}

/// Keeps the first occurrence of every dedup key, in scan order, up to `limit` hits.
fn merge(hits: impl IntoIterator<Item = RetrievalResult>, limit: usize) -> Vec<RetrievalResult> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.dedup_key().to_owned()))
        .take(limit)
        .collect()
}
