//! Batched embedding executor with bounded concurrency.
//!
//! Segments are embedded batch by batch: all calls inside one batch run
//! concurrently (the batch size is the concurrency cap), batches themselves
//! run sequentially with a short pause in between to pace throughput against
//! backend rate limits. Completion order inside a batch varies; results are
//! written back by index so the output order always matches the input.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::EmbedBatchConfig;
use crate::embed::{EmbedIntent, Embedder};
use crate::errors::IndexError;
use crate::record::Segment;

/// Fills embeddings for the given segments, in place, batch by batch.
///
/// A segment whose embed call fails (after the provider's own retries) is
/// passed through unchanged with `embedding: None`; one bad segment must not
/// sink the whole document. This function therefore never fails, it only
/// logs what was left behind.
pub async fn embed_segments(
    mut segments: Vec<Segment>,
    embedder: &dyn Embedder,
    cfg: &EmbedBatchConfig,
) -> Vec<Segment> {
    let total = segments.len();
    if total == 0 {
        debug!("embed_segments: nothing to embed");
        return segments;
    }

    let batch_size = cfg.batch_size.max(1);
    let batch_count = total.div_ceil(batch_size);
    info!(
        "embed_segments: total={} batch_size={} batches={}",
        total, batch_size, batch_count
    );

    let mut failed = 0usize;

    for (batch_no, batch_start) in (0..total).step_by(batch_size).enumerate() {
        let batch_end = (batch_start + batch_size).min(total);

        let results: Vec<(usize, Result<Vec<f32>, IndexError>)> =
            stream::iter(batch_start..batch_end)
                .map(|i| {
                    let text = segments[i].text.clone();
                    let title = segments[i].title();
                    async move {
                        let out = embedder
                            .embed(&text, EmbedIntent::Document, Some(&title))
                            .await;
                        (i, out)
                    }
                })
                .buffer_unordered(batch_size)
                .collect()
                .await;

        for (i, out) in results {
            match out {
                Ok(vector) => segments[i].embedding = Some(vector),
                Err(e) => {
                    failed += 1;
                    warn!("segment {} left without a vector: {e}", segments[i].id);
                }
            }
        }

        if batch_no + 1 < batch_count {
            tokio::time::sleep(cfg.pause).await;
        }
    }

    if failed > 0 {
        warn!("embed_segments: {failed}/{total} segments have no vector");
    } else {
        debug!("embed_segments: all {total} segments embedded");
    }

    segments
}
