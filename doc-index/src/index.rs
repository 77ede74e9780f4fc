//! In-memory vector index with exact cosine top-K search.
//!
//! Holds the segments of exactly one document (one "generation"). Loading a
//! new document swaps the whole generation through [`VectorIndex::reset_with`]
//! so a query can never observe a mix of old and new segments.

use tracing::{debug, trace};

use crate::record::{SearchHit, Segment};

/// Score assigned to segments without an embedding.
///
/// Valid cosine similarities live in [-1, 1]; this sentinel is strictly
/// below that range, so a vector-less segment can never outrank an embedded
/// one while still taking part in the (stable) ordering.
pub const SENTINEL_SCORE: f32 = f32::NEG_INFINITY;

/// Brute-force in-memory index over one document's segments.
///
/// Every search is an O(n·d) scan; with one document's worth of segments in
/// memory that is cheaper than maintaining any index structure.
#[derive(Debug, Default)]
pub struct VectorIndex {
    segments: Vec<Segment>,
}

impl VectorIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends segments to the live generation.
    ///
    /// Empty input is a no-op. Ids are not deduplicated here; feeding
    /// duplicate ids is a caller error.
    pub fn add(&mut self, segments: Vec<Segment>) {
        if segments.is_empty() {
            return;
        }
        trace!("index::add count={}", segments.len());
        self.segments.extend(segments);
    }

    /// Empties the live generation.
    pub fn clear(&mut self) {
        trace!("index::clear previous={}", self.segments.len());
        self.segments.clear();
    }

    /// Replaces the whole generation in one step (clear + add).
    pub fn reset_with(&mut self, segments: Vec<Segment>) {
        debug!(
            "index::reset_with previous={} next={}",
            self.segments.len(),
            segments.len()
        );
        self.segments = segments;
    }

    /// Number of indexed segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the index holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the top `min(k, len)` segments by cosine similarity against
    /// `query`, descending, ties broken by insertion order.
    ///
    /// Segments without an embedding score [`SENTINEL_SCORE`] and therefore
    /// sort behind every embedded segment.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .segments
            .iter()
            .map(|segment| SearchHit {
                score: segment
                    .embedding
                    .as_deref()
                    .map(|v| cosine_similarity(query, v))
                    .unwrap_or(SENTINEL_SCORE),
                segment: segment.clone(),
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);

        trace!("index::search k={} hits={}", k, hits.len());
        hits
    }
}

/// Cosine similarity of two vectors.
///
/// Defined as 0 when either vector has zero magnitude, and 0 for mismatched
/// lengths; both degenerate inputs rank like "no signal" instead of
/// erroring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    dot / denominator
}
