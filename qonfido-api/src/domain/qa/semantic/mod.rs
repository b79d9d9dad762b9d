//! Semantic search implementations.

mod pinecone_index;

pub use pinecone_index::{PineconeSemanticSearch, METADATA_FIELD, TEXT_FIELD};
