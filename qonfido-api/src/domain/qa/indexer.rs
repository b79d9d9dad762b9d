//! Startup ingestion of the document corpus into the vector index.

use std::time::Duration;

use pinecone::{CreateIndexForModelRequest, EmbedConfig, PineconeClient, Record};
use serde_json::Value;
use tracing::{info, warn};

use super::semantic::{METADATA_FIELD, TEXT_FIELD};
use super::traits::{DocumentStore, QaError, Result};
use super::types::Document;

/// Configuration for the vector indexer.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub index_name: String,
    pub namespace: String,
    pub embedding_model: String,
    pub cloud: String,
    pub region: String,
    /// How long to wait for a newly created index to become ready
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
    /// Records per upsert request
    pub batch_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            index_name: "qonfido-llama-index".to_string(),
            namespace: "default".to_string(),
            embedding_model: "llama-text-embed-v2".to_string(),
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            ready_timeout: Duration::from_secs(180),
            poll_interval: Duration::from_secs(5),
            batch_size: 96,
        }
    }
}

/// Creates the vector index when missing and upserts every document into it.
pub struct VectorIndexer<D: DocumentStore> {
    client: PineconeClient,
    store: D,
    config: IndexerConfig,
}

impl<D: DocumentStore> VectorIndexer<D> {
    pub fn new(client: PineconeClient, store: D, config: IndexerConfig) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    async fn ensure_index(&self) -> Result<()> {
        let name = &self.config.index_name;
        let existing = self.client.list_indexes().await.map_err(unavailable)?;
        if existing.contains(name) {
            info!(index = %name, "Index already exists");
            return Ok(());
        }

        let request = CreateIndexForModelRequest {
            name: name.clone(),
            cloud: self.config.cloud.clone(),
            region: self.config.region.clone(),
            embed: EmbedConfig::for_text_field(&self.config.embedding_model, TEXT_FIELD),
        };
        self.client
            .create_index_for_model(&request)
            .await
            .map_err(unavailable)?;
        self.client
            .wait_until_ready(name, self.config.ready_timeout, self.config.poll_interval)
            .await
            .map_err(unavailable)?;

        info!(index = %name, "Index created and ready");
        Ok(())
    }

    /// Syncs all documents. Returns the number of records upserted.
    pub async fn sync(&self) -> Result<usize> {
        self.ensure_index().await?;

        let documents = self.store.load_all_documents().await?;
        if documents.is_empty() {
            warn!("No documents were loaded; skipping upsert");
            return Ok(0);
        }

        let index = self
            .client
            .index(&self.config.index_name)
            .await
            .map_err(unavailable)?;

        let records = build_records(&documents);
        let mut upserted = 0;
        for batch in records.chunks(self.config.batch_size.max(1)) {
            upserted += index
                .upsert_records(&self.config.namespace, batch)
                .await
                .map_err(unavailable)?;
        }

        info!(
            records = upserted,
            index = %self.config.index_name,
            namespace = %self.config.namespace,
            "Upserted records"
        );
        Ok(upserted)
    }
}

fn unavailable(e: pinecone::PineconeError) -> QaError {
    QaError::semantic_unavailable(e.to_string())
}

/// Converts documents to index records.
///
/// Each record holds the passage text, the full metadata as a JSON string, and
/// every scalar metadata field as a filterable `meta_{key}` field.
pub fn build_records(documents: &[Document]) -> Vec<Record> {
    documents
        .iter()
        .enumerate()
        .map(|(idx, document)| {
            let mut record =
                Record::new(format!("doc-{}", idx)).with_field(TEXT_FIELD, document.content.as_str());

            if document.metadata.is_empty() {
                return record;
            }

            if let Ok(Value::Object(fields)) = serde_json::to_value(&document.metadata) {
                record = record.with_field(METADATA_FIELD, Value::Object(fields.clone()).to_string());
                for (key, value) in fields {
                    if is_scalar(&value) {
                        record = record.with_field(format!("meta_{}", key), value);
                    }
                }
            }
            record
        })
        .collect()
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
