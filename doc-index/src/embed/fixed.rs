//! Deterministic in-process embedder for tests and offline runs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use llm_service::LlmError;

use crate::embed::{EmbedIntent, Embedder};
use crate::errors::IndexError;

/// Embedder that derives a small unit vector from the text itself.
///
/// Identical texts map to identical vectors, so ranking behavior is
/// reproducible without a backend. Texts containing `fail_marker` (when set)
/// fail with a terminal error, which exercises the vector-less degradation
/// paths.
#[derive(Clone, Debug, Default)]
pub struct FixedEmbedder {
    /// Substring that makes an embed call fail. `None` = never fail.
    pub fail_marker: Option<String>,
}

impl FixedEmbedder {
    /// Embedder that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Embedder that fails for texts containing `marker`.
    pub fn failing_on(marker: impl Into<String>) -> Self {
        Self {
            fail_marker: Some(marker.into()),
        }
    }

    fn vector_for(text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let h = hasher.finish();

        // Four pseudo-random components, normalized to unit length.
        let raw: Vec<f32> = (0..4)
            .map(|i| ((h >> (i * 16)) & 0xffff) as f32 / 65535.0 - 0.5)
            .collect();
        let norm = raw.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        raw.into_iter().map(|x| x / norm).collect()
    }
}

impl Embedder for FixedEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
        _intent: EmbedIntent,
        _title: Option<&'a str>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>,
    > {
        Box::pin(async move {
            if let Some(marker) = &self.fail_marker {
                if text.contains(marker.as_str()) {
                    return Err(IndexError::Embedding(LlmError::Decode(
                        "scripted failure".into(),
                    )));
                }
            }
            Ok(Self::vector_for(text))
        })
    }
}
