//! Fund Q&A - hybrid retrieval and answer composition over fund and FAQ data.
//!
//! This module answers natural-language questions by combining:
//! - **Semantic search** via a Pinecone index with integrated embeddings
//! - **Lexical search** via an in-process BM25 index over the same corpus
//! - **Answer synthesis** via Gemini over a rendered context block
//!
//! # Architecture
//!
//! Every collaborator sits behind a trait so the engine can run against mocks:
//!
//! - `DocumentStore` - The document corpus (CSV datasets)
//! - `SemanticSearch` - Vector search backend (Pinecone)
//! - `LexicalSearch` - Term-overlap backend ([`LazyLexicalSearch`])
//! - `AnswerModel` - Language model (Gemini)
//!
//! # Retrieval modes
//!
//! - `semantic` - vector search only (also the fallback for unknown modes)
//! - `lexical` - BM25 only
//! - `hybrid` - both, semantic hits first, deduplicated by `doc_id`, truncated to `top_k`
//!
//! # Example
//!
//! ```ignore
//! let store = CsvDocumentStore::new("data/faqs.csv", "data/funds.csv");
//! let semantic = PineconeSemanticSearch::new(client, "qonfido-llama-index", "default");
//! let lexical = LazyLexicalSearch::new(store);
//! let service = QaService::with_defaults(semantic, lexical, GeminiAnswerModel::with_defaults()?);
//!
//! let payload = service.answer("Which fund has the best Sharpe ratio?", Some(3), SearchMode::Hybrid).await?;
//! ```

mod context;
mod highlights;
mod indexer;
mod payload;
mod retriever;
mod service;
mod traits;
mod types;

pub mod lexical;
pub mod model;
pub mod semantic;
pub mod source;

#[cfg(test)]
pub(crate) mod mock;

// Re-export main types
pub use indexer::{IndexerConfig, VectorIndexer};
pub use lexical::LazyLexicalSearch;
pub use service::{QaConfig, QaService};
pub use traits::{QaError, QuestionAnswering};
pub use types::{AnswerPayload, SearchMode};

#[cfg(test)]
pub(crate) use types::RetrievalMode;
