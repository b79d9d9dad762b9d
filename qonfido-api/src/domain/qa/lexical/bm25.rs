//! BM25 Okapi index over an immutable document corpus.

use std::collections::HashMap;

use super::tokenizer::tokenize;
use crate::domain::qa::types::Document;

const BM25_K1: f32 = 1.5;
const BM25_B: f32 = 0.75;

#[derive(Debug, Clone, Copy)]
struct Posting {
    doc: usize,
    term_frequency: u32,
}

/// Inverted index plus the documents it was built from.
#[derive(Debug)]
pub struct Bm25Index {
    documents: Vec<Document>,
    postings: HashMap<String, Vec<Posting>>,
    doc_lengths: Vec<u32>,
    avg_doc_length: f32,
}

impl Bm25Index {
    /// Builds the index. Callers reject an empty corpus before getting here.
    pub fn build(documents: Vec<Document>) -> Self {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lengths = Vec::with_capacity(documents.len());

        for (doc, document) in documents.iter().enumerate() {
            let tokens = tokenize(&document.content);
            doc_lengths.push(tokens.len() as u32);

            let mut frequencies: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *frequencies.entry(token).or_insert(0) += 1;
            }
            for (token, term_frequency) in frequencies {
                postings.entry(token).or_default().push(Posting {
                    doc,
                    term_frequency,
                });
            }
        }

        let total: u32 = doc_lengths.iter().sum();
        let avg_doc_length = if doc_lengths.is_empty() {
            0.0
        } else {
            total as f32 / doc_lengths.len() as f32
        };

        Self {
            documents,
            postings,
            doc_lengths,
            avg_doc_length,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn scores(&self, query: &str) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.documents.len()];
        let n = self.documents.len() as f32;
        let avgdl = self.avg_doc_length.max(f32::EPSILON);

        for token in tokenize(query) {
            let Some(postings) = self.postings.get(&token) else {
                continue;
            };
            let df = postings.len() as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();

            for posting in postings {
                let dl = self.doc_lengths[posting.doc] as f32;
                let tf = posting.term_frequency as f32;
                let tf_norm =
                    (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * dl / avgdl));
                scores[posting.doc] += idf * tf_norm;
            }
        }

        scores
    }

    /// Returns the `limit` best documents with their scores, best first.
    ///
    /// Like a top-n BM25 retriever, documents that match nothing still fill the
    /// remaining slots (score 0). Equal scores keep corpus order.
    pub fn top_n(&self, query: &str, limit: usize) -> Vec<(&Document, f32)> {
        let scores = self.scores(query);
        let mut ranked: Vec<usize> = (0..self.documents.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        ranked
            .into_iter()
            .take(limit)
            .map(|doc| (&self.documents[doc], scores[doc]))
            .collect()
    }
}
