//! Chunking and embedding-batch configuration.

use std::time::Duration;

/// Sliding-window chunking parameters (all in characters of the normalized
/// page text).
#[derive(Clone, Copy, Debug)]
pub struct ChunkConfig {
    /// Window size. Default 1000.
    pub window_chars: usize,
    /// Overlap between consecutive windows. Default 200; must stay below the
    /// window size for the window start to advance.
    pub overlap_chars: usize,
    /// Candidates whose trimmed length falls below this are dropped.
    /// Default 50.
    pub min_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            window_chars: 1000,
            overlap_chars: 200,
            min_chars: 50,
        }
    }
}

impl ChunkConfig {
    /// Builds from environment (`CHUNK_WINDOW_CHARS`, `CHUNK_OVERLAP_CHARS`,
    /// `CHUNK_MIN_CHARS`) with defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            window_chars: parse("CHUNK_WINDOW_CHARS", d.window_chars),
            overlap_chars: parse("CHUNK_OVERLAP_CHARS", d.overlap_chars),
            min_chars: parse("CHUNK_MIN_CHARS", d.min_chars),
        }
    }

    /// Window start advance per step. Saturates to at least 1 so progress is
    /// guaranteed even for a misconfigured overlap >= window.
    pub fn step(&self) -> usize {
        self.window_chars.saturating_sub(self.overlap_chars).max(1)
    }
}

/// Batch shape for the embedding executor.
#[derive(Clone, Copy, Debug)]
pub struct EmbedBatchConfig {
    /// Segments embedded concurrently per batch; also the concurrency cap.
    /// Default 10.
    pub batch_size: usize,
    /// Pause between consecutive batches (not after the last). Default 100 ms.
    pub pause: Duration,
}

impl Default for EmbedBatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            pause: Duration::from_millis(100),
        }
    }
}

impl EmbedBatchConfig {
    /// Builds from environment (`EMBED_BATCH_SIZE`, `EMBED_BATCH_PAUSE_MS`)
    /// with defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            batch_size: parse("EMBED_BATCH_SIZE", d.batch_size).max(1),
            pause: Duration::from_millis(parse("EMBED_BATCH_PAUSE_MS", 100)),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
