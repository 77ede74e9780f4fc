//! Gemini-backed embedding provider with retry.

use std::sync::Arc;

use llm_service::{Backoff, GeminiService, retry::retry_with};

use crate::embed::{EmbedIntent, Embedder};
use crate::errors::IndexError;

/// Embedding provider that drives [`GeminiService::embed_content`] through
/// the retry policy.
///
/// Transient failures (rate limit, server fault) are retried with backoff
/// inside this type; whatever error comes out of [`Embedder::embed`] is
/// final, so callers treat it as "this text has no vector" rather than
/// something to retry again.
#[derive(Clone)]
pub struct GeminiEmbedder {
    svc: Arc<GeminiService>,
    backoff: Backoff,
}

impl GeminiEmbedder {
    /// Constructs a provider from a shared service and a retry policy.
    pub fn new(svc: Arc<GeminiService>, backoff: Backoff) -> Self {
        Self { svc, backoff }
    }
}

impl Embedder for GeminiEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
        intent: EmbedIntent,
        title: Option<&'a str>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>,
    > {
        Box::pin(async move {
            let vector = retry_with(&self.backoff, || {
                self.svc.embed_content(text, intent, title)
            })
            .await?;
            Ok(vector)
        })
    }
}
