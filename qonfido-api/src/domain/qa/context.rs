//! Rendering of retrieved hits into the context block and prompt for the model.

use super::types::RetrievalResult;

const QA_INSTRUCTIONS: &str = "You are a helpful financial assistant. Use the provided context to answer the question.\n\
If the answer is not in the context, say you do not know.";

/// Renders each hit as a numbered block, in input order, separated by blank lines.
pub fn compose_context(results: &[RetrievalResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(idx, result)| render_block(idx + 1, result))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(position: usize, result: &RetrievalResult) -> String {
    let score = result
        .score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "null".to_string());

    let mut lines = vec![
        format!("Source {} ({})", position, result.retrieval_mode),
        format!("Score: {}", score),
    ];

    let entries = result.metadata.entries();
    if !entries.is_empty() {
        lines.push("Metadata:".to_string());
        lines.extend(
            entries
                .into_iter()
                .map(|(key, value)| format!("- {}: {}", key, value)),
        );
    }

    lines.push("Content:".to_string());
    lines.push(result.content.clone());
    lines.join("\n")
}

/// Fills the question-answering prompt template.
pub fn render_prompt(context: &str, question: &str) -> String {
    format!(
        "{}\n\nContext:\n{}\n\nQuestion: {}\nAnswer:",
        QA_INSTRUCTIONS, context, question
    )
}
