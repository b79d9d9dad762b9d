//! Tokenizer for the lexical index.
//!
//! Lowercases, splits on non-alphanumeric characters, and drops single-character
//! tokens and common English stop words.

use std::collections::HashSet;
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
        "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
        "they", "this", "to", "was", "will", "with", "what", "which", "me", "my",
    ]
    .into_iter()
    .collect()
});

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 1 && !STOP_WORDS.contains(token))
        .map(str::to_owned)
        .collect()
}
