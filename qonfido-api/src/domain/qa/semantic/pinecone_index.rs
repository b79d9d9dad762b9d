//! Semantic search against a Pinecone index with integrated embedding.

use async_trait::async_trait;
use pinecone::{Hit, IndexClient, PineconeClient, SearchRecordsRequest};
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

use crate::domain::qa::traits::{QaError, Result, SemanticSearch};
use crate::domain::qa::types::{Metadata, RetrievalMode, RetrievalResult};

/// Record field holding the embedded passage text.
pub const TEXT_FIELD: &str = "text";
/// Record field holding the document metadata as a JSON string.
pub const METADATA_FIELD: &str = "metadata_json";

/// [`SemanticSearch`] over one namespace of a Pinecone index.
///
/// The index host is resolved on first use and cached.
pub struct PineconeSemanticSearch {
    client: PineconeClient,
    index_name: String,
    namespace: String,
    index: OnceCell<IndexClient>,
}

impl PineconeSemanticSearch {
    pub fn new(
        client: PineconeClient,
        index_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            client,
            index_name: index_name.into(),
            namespace: namespace.into(),
            index: OnceCell::new(),
        }
    }

    async fn index(&self) -> Result<&IndexClient> {
        self.index
            .get_or_try_init(|| self.client.index(&self.index_name))
            .await
            .map_err(|e| QaError::semantic_unavailable(e.to_string()))
    }
}

#[async_trait]
impl SemanticSearch for PineconeSemanticSearch {
    #[instrument(name = "semantic_search", skip(self), fields(index = %self.index_name))]
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalResult>> {
        let index = self.index().await?;
        let request = SearchRecordsRequest::text(query, top_k).with_fields([TEXT_FIELD, METADATA_FIELD]);

        let hits = index
            .search_records(&self.namespace, &request)
            .await
            .map_err(|e| QaError::semantic_unavailable(e.to_string()))?;

        let results: Vec<RetrievalResult> = hits.iter().filter_map(to_retrieval_result).collect();
        debug!(hits = hits.len(), results = results.len(), "Semantic search completed");
        Ok(results)
    }
}

/// Converts a search hit, skipping hits without passage text.
fn to_retrieval_result(hit: &Hit) -> Option<RetrievalResult> {
    let content = hit.field_str(TEXT_FIELD).unwrap_or_default();
    if content.is_empty() {
        warn!(id = %hit.id, "Skipping hit without text");
        return None;
    }

    let metadata = match hit.field_str(METADATA_FIELD) {
        Some(raw) => serde_json::from_str::<Metadata>(raw).unwrap_or_else(|e| {
            warn!(id = %hit.id, error = %e, "Ignoring malformed hit metadata");
            Metadata::default()
        }),
        None => Metadata::default(),
    };

    Some(RetrievalResult {
        content: content.to_string(),
        metadata,
        score: Some(hit.score),
        retrieval_mode: RetrievalMode::Semantic,
    })
}
