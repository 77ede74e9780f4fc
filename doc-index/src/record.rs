//! Core data models for the segment store.

use serde::{Deserialize, Serialize};

/// One retrievable slice of a source page.
///
/// `embedding` stays `None` until the batch executor fills it, and is never
/// mutated afterwards. A segment that could not be embedded keeps `None` and
/// simply never wins a ranking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    /// Stable id, `p{page}-{offset}` with the window start in normalized
    /// characters. Unique within one document load.
    pub id: String,
    /// Normalized chunk text.
    pub text: String,
    /// 1-based source page number.
    pub page: u32,
    /// Embedding vector, absent until embedded (and kept absent on failure).
    pub embedding: Option<Vec<f32>>,
}

impl Segment {
    /// Short label attached to document-intent embedding calls.
    pub fn title(&self) -> String {
        format!("Page {}", self.page)
    }
}

/// A single search result with its similarity score.
#[derive(Clone, Debug)]
pub struct SearchHit {
    /// Cosine similarity against the query vector, or the below-range
    /// sentinel for segments without a vector.
    pub score: f32,
    /// The matched segment.
    pub segment: Segment,
}
