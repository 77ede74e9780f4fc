//! Prompt builder: fixed grounding rules + context block + bounded history.

use doc_index::SearchHit;

use crate::api_types::Turn;

/// Fixed system rules for grounded answers.
///
/// Keep this short: it consistently improves steering without wasting tokens.
pub const SYSTEM_RULES: &str = "You are a helpful and intelligent assistant answering questions about an uploaded document.\n\
Rules:\n\
1. Use ONLY the information in the Context below to answer.\n\
2. If the answer is not in the Context, politely state that the document doesn't contain that information. Do not hallucinate.\n\
3. Cite the page numbers when possible (e.g., \"According to page 3...\").\n\
4. Keep the tone professional but conversational.";

/// Literal substituted when retrieval finds nothing.
///
/// The generation backend always receives a non-empty context block; an
/// empty string would be ambiguous between "no document" and "no match".
pub const NO_CONTEXT_MARKER: &str = "No relevant context found in the document.";

/// Builds the full generation prompt.
///
/// Layout: system rules, retrieved context as `[Page N]: text` blocks in
/// ranked order (or [`NO_CONTEXT_MARKER`]), the most recent turns rendered as
/// `role: content` lines, then the verbatim question.
pub fn build_prompt(question: &str, hits: &[SearchHit], recent_history: &[Turn]) -> String {
    let context = if hits.is_empty() {
        NO_CONTEXT_MARKER.to_string()
    } else {
        hits.iter()
            .map(|h| format!("[Page {}]: {}", h.segment.page, h.segment.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let history = recent_history
        .iter()
        .map(|t| format!("{}: {}", t.role.label(), t.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{SYSTEM_RULES}\n\nContext:\n{context}\n\nChat History:\n{history}\n\nUser Question:\n{question}"
    )
}
