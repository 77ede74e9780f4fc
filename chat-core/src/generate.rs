//! Generation backend seam.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use llm_service::GeminiService;

use crate::error::ChatError;

/// Provider interface for answer generation.
///
/// Mirrors the embedding seam in `doc-index`: the orchestrator only sees
/// this trait, so tests can count calls and script failures without a
/// backend.
pub trait Generator: Send + Sync {
    /// Generates the answer text for a fully assembled prompt.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        temperature: f32,
    ) -> Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>>;
}

/// Gemini-backed generator.
///
/// Generation is not retried: a failed call becomes the fixed error answer
/// immediately, and the conversation carries on.
#[derive(Clone)]
pub struct GeminiGenerator {
    svc: Arc<GeminiService>,
}

impl GeminiGenerator {
    pub fn new(svc: Arc<GeminiService>) -> Self {
        Self { svc }
    }
}

impl Generator for GeminiGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        temperature: f32,
    ) -> Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>> {
        Box::pin(async move {
            let text = self.svc.generate(prompt, temperature).await?;
            Ok(text)
        })
    }
}
