mod client;
mod error;
mod index;
mod models;

pub use client::*;
pub use error::PineconeError;
pub use index::IndexClient;
pub use models::*;
