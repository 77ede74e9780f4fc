//! Runtime configuration loaded from environment variables.

use doc_index::{ChunkConfig, EmbedBatchConfig};

/// Config bag for the orchestrator. All fields have defaults via `from_env`.
#[derive(Clone, Copy, Debug)]
pub struct ChatConfig {
    /// Segments retrieved per question.
    pub top_k: usize,
    /// Most recent turns rendered into the prompt.
    pub history_turns: usize,
    /// Sampling temperature passed to the generation backend. Low by
    /// default: answers should stick to the retrieved context.
    pub temperature: f32,

    /// Chunking knobs forwarded to the segment store.
    pub chunking: ChunkConfig,
    /// Embedding batch knobs forwarded to the segment store.
    pub batching: EmbedBatchConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            history_turns: 4,
            temperature: 0.3,
            chunking: ChunkConfig::default(),
            batching: EmbedBatchConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Builds from environment variables with defaults for anything unset:
    /// `RAG_TOP_K` (5), `HISTORY_TURNS` (4), `GEN_TEMPERATURE` (0.3), plus
    /// the chunking/batching variables read by the store configs.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            top_k: parse("RAG_TOP_K", d.top_k),
            history_turns: parse("HISTORY_TURNS", d.history_turns),
            temperature: parse("GEN_TEMPERATURE", d.temperature),
            chunking: ChunkConfig::from_env(),
            batching: EmbedBatchConfig::from_env(),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
