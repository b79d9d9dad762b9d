//! Document store reading the FAQ and fund CSV datasets.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::domain::qa::traits::{DocumentStore, QaError, Result};
use crate::domain::qa::types::{Document, Metadata, FAQ_SOURCE, FUND_SOURCE};

#[derive(Debug, Deserialize)]
struct FaqRow {
    question: String,
    answer: String,
}

/// Numeric columns are kept as written so the rendered content matches the dataset.
/// Blank numeric cells load as missing values.
#[derive(Debug, Deserialize)]
struct FundRow {
    fund_id: String,
    fund_name: String,
    category: String,
    #[serde(rename = "cagr_3yr (%)")]
    cagr: String,
    #[serde(rename = "volatility (%)")]
    volatility: String,
    sharpe_ratio: String,
}

/// Loads FAQ documents followed by fund documents from two CSV files.
#[derive(Debug, Clone)]
pub struct CsvDocumentStore {
    faq_path: PathBuf,
    funds_path: PathBuf,
}

impl CsvDocumentStore {
    pub fn new(faq_path: impl Into<PathBuf>, funds_path: impl Into<PathBuf>) -> Self {
        Self {
            faq_path: faq_path.into(),
            funds_path: funds_path.into(),
        }
    }

    fn load_blocking(faq_path: &Path, funds_path: &Path) -> Result<Vec<Document>> {
        let mut documents = load_faq_documents(faq_path)?;
        let funds = load_fund_documents(funds_path)?;
        info!(faqs = documents.len(), funds = funds.len(), "Loaded documents");

        documents.extend(funds);
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for CsvDocumentStore {
    async fn load_all_documents(&self) -> Result<Vec<Document>> {
        let faq_path = self.faq_path.clone();
        let funds_path = self.funds_path.clone();

        tokio::task::spawn_blocking(move || Self::load_blocking(&faq_path, &funds_path))
            .await
            .map_err(|e| QaError::Source(format!("document loading task failed: {}", e)))?
    }
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| QaError::Source(format!("{}: {}", path.display(), e)))
}

fn load_faq_documents(path: &Path) -> Result<Vec<Document>> {
    let mut reader = reader(path)?;
    reader
        .deserialize::<FaqRow>()
        .enumerate()
        .map(|(idx, row)| -> Result<Document> {
            let row = row.map_err(|e| QaError::Source(format!("{}: {}", path.display(), e)))?;
            Ok(Document {
                content: format!("Q: {}\nA: {}", row.question, row.answer),
                metadata: Metadata {
                    source: Some(FAQ_SOURCE.to_string()),
                    question: Some(row.question),
                    doc_id: Some(format!("faq_{}", idx)),
                    ..Default::default()
                },
            })
        })
        .collect()
}

fn load_fund_documents(path: &Path) -> Result<Vec<Document>> {
    let mut reader = reader(path)?;
    reader
        .deserialize::<FundRow>()
        .enumerate()
        .map(|(idx, row)| -> Result<Document> {
            let row = row.map_err(|e| QaError::Source(format!("{}: {}", path.display(), e)))?;
            let content = format!(
                "Fund: {}\nCategory: {}\n3-Year CAGR: {}%\nVolatility: {}%\nSharpe Ratio: {}",
                row.fund_name, row.category, row.cagr, row.volatility, row.sharpe_ratio
            );

            Ok(Document {
                content,
                metadata: Metadata {
                    source: Some(FUND_SOURCE.to_string()),
                    sharpe_ratio: parse_number(path, idx, "sharpe_ratio", &row.sharpe_ratio)?,
                    cagr: parse_number(path, idx, "cagr_3yr (%)", &row.cagr)?,
                    fund_id: Some(row.fund_id),
                    fund_name: Some(row.fund_name),
                    category: Some(row.category),
                    doc_id: Some(format!("fund_{}", idx)),
                    ..Default::default()
                },
            })
        })
        .collect()
}

fn parse_number(path: &Path, row: usize, column: &str, value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    value.parse().map(Some).map_err(|_| {
        QaError::Source(format!(
            "{}: row {}: column '{}' is not a number: '{}'",
            path.display(),
            row,
            column,
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::qa::highlights::rank_highlights;
    use crate::domain::qa::types::{RetrievalMode, RetrievalResult};

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn faqs() -> tempfile::NamedTempFile {
        write_csv(
            "question,answer\n\
             What is NAV?,Net asset value per unit.\n\
             \"What is a SIP, exactly?\",A systematic investment plan.\n",
        )
    }

    fn funds() -> tempfile::NamedTempFile {
        write_csv(
            "fund_id,fund_name,category,cagr_3yr (%),volatility (%),sharpe_ratio\n\
             F001,Alpha Equity,Large Cap,14.2,11.0,1.25\n\
             F002,Beta Debt,Debt,7.0,2.1,0.8\n",
        )
    }

    #[tokio::test]
    async fn loads_faqs_then_funds() {
        let (faq_file, fund_file) = (faqs(), funds());
        let store = CsvDocumentStore::new(faq_file.path(), fund_file.path());

        let documents = store.load_all_documents().await.unwrap();

        let ids: Vec<_> = documents
            .iter()
            .map(|d| d.metadata.doc_id().unwrap())
            .collect();
        assert_eq!(ids, vec!["faq_0", "faq_1", "fund_0", "fund_1"]);

        assert_eq!(
            documents[1].content,
            "Q: What is a SIP, exactly?\nA: A systematic investment plan."
        );
        assert_eq!(documents[1].metadata.source.as_deref(), Some("faq"));
        assert_eq!(
            documents[1].metadata.question.as_deref(),
            Some("What is a SIP, exactly?")
        );
    }

    #[tokio::test]
    async fn fund_documents_carry_typed_metadata() {
        let (faq_file, fund_file) = (faqs(), funds());
        let store = CsvDocumentStore::new(faq_file.path(), fund_file.path());

        let documents = store.load_all_documents().await.unwrap();
        let fund = &documents[2];

        assert_eq!(
            fund.content,
            "Fund: Alpha Equity\nCategory: Large Cap\n3-Year CAGR: 14.2%\nVolatility: 11.0%\nSharpe Ratio: 1.25"
        );
        assert!(fund.metadata.is_fund());
        assert_eq!(fund.metadata.fund_id.as_deref(), Some("F001"));
        assert_eq!(fund.metadata.sharpe_ratio, Some(1.25));
        assert_eq!(fund.metadata.cagr, Some(14.2));
        assert_eq!(documents[3].metadata.cagr, Some(7.0));
    }

    #[tokio::test]
    async fn missing_file_is_source_error() {
        let fund_file = funds();
        let store = CsvDocumentStore::new("/definitely/not/here.csv", fund_file.path());

        let err = store.load_all_documents().await.unwrap_err();
        assert!(matches!(err, QaError::Source(_)));
    }

    #[tokio::test]
    async fn non_numeric_ratio_is_source_error() {
        let faq_file = faqs();
        let fund_file = write_csv(
            "fund_id,fund_name,category,cagr_3yr (%),volatility (%),sharpe_ratio\n\
             F001,Alpha,Equity,12,10,high\n",
        );
        let store = CsvDocumentStore::new(faq_file.path(), fund_file.path());

        let err = store.load_all_documents().await.unwrap_err();
        assert!(err.to_string().contains("sharpe_ratio"));
    }

    #[tokio::test]
    async fn blank_ratio_loads_as_missing_and_ranks_last() {
        let faq_file = faqs();
        let fund_file = write_csv(
            "fund_id,fund_name,category,cagr_3yr (%),volatility (%),sharpe_ratio\n\
             F001,Alpha Equity,Large Cap,14.2,11.0,\n\
             F002,Beta Debt,Debt,,2.1,0.8\n",
        );
        let store = CsvDocumentStore::new(faq_file.path(), fund_file.path());

        let documents = store.load_all_documents().await.unwrap();
        assert_eq!(documents.len(), 4);
        assert_eq!(documents[2].metadata.sharpe_ratio, None);
        assert_eq!(documents[2].metadata.cagr, Some(14.2));
        assert_eq!(documents[3].metadata.cagr, None);

        let results: Vec<_> = documents
            .into_iter()
            .map(|document| RetrievalResult {
                content: document.content,
                metadata: document.metadata,
                score: None,
                retrieval_mode: RetrievalMode::Lexical,
            })
            .collect();
        let ranked: Vec<_> = rank_highlights(&results)
            .into_iter()
            .map(|h| h.fund_name.unwrap())
            .collect();
        assert_eq!(ranked, vec!["Beta Debt", "Alpha Equity"]);
    }

    #[tokio::test]
    async fn empty_datasets_yield_no_documents() {
        let faq_file = write_csv("question,answer\n");
        let fund_file =
            write_csv("fund_id,fund_name,category,cagr_3yr (%),volatility (%),sharpe_ratio\n");
        let store = CsvDocumentStore::new(faq_file.path(), fund_file.path());

        assert!(store.load_all_documents().await.unwrap().is_empty());
    }
}
