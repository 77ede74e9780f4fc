//! Embedding provider seam.
//!
//! The store never talks to a backend directly; it goes through [`Embedder`]
//! so the batch executor and the orchestrator can run against the real
//! Gemini-backed provider or a deterministic in-process one (tests).

use std::{future::Future, pin::Pin};

use crate::errors::IndexError;

pub use llm_service::EmbedIntent;

/// Provider interface for embedding generation.
///
/// Async by nature (real providers perform HTTP requests); object-safe so it
/// can sit behind `Arc<dyn Embedder>`.
pub trait Embedder: Send + Sync {
    /// Embeds one text.
    ///
    /// `intent` distinguishes query-time from document-time embeddings and
    /// must be forwarded to the backend unchanged. `title` is an optional
    /// short label, only meaningful for [`EmbedIntent::Document`].
    fn embed<'a>(
        &'a self,
        text: &'a str,
        intent: EmbedIntent,
        title: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>;
}

pub mod fixed;
pub mod gemini;
