//! Typed error for the chat-core crate.
//!
//! Deliberately small: most failures inside the ask path degrade into fixed
//! answer strings instead of surfacing here (see the crate docs). Ingestion
//! is the one operation with a hard failure mode.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The page source yielded no usable segments; there is nothing to
    /// index. The previously loaded document (if any) stays live.
    #[error("document produced no indexable text")]
    EmptyDocument,

    /// Errors from the generation backend, surfaced only through the
    /// [`crate::Generator`] seam (the orchestrator converts them into the
    /// fixed error answer).
    #[error("generation error: {0}")]
    Generation(#[from] llm_service::LlmError),
}
