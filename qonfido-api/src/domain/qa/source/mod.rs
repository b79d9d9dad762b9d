//! Document sources.

mod datasets;

pub use datasets::CsvDocumentStore;
