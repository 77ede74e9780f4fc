//! Error type for the segment store.

use thiserror::Error;

/// Top-level error for doc-index operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IndexError {
    /// Backend embedding failure, after the retry policy gave up (or the
    /// failure was terminal to begin with).
    #[error("embedding failed: {0}")]
    Embedding(#[from] llm_service::LlmError),
}
