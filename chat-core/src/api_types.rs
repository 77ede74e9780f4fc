//! Public API types re-used by callers of the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The model's answer.
    Assistant,
}

impl Role {
    /// Lowercase label used when rendering history into a prompt.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation turn. Held in memory for the session only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Outcome of a successful document load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Display name of the source (file name).
    pub name: String,
    /// Source size in bytes.
    pub size_bytes: u64,
    /// Number of pages the source reported.
    pub page_count: u32,
    /// Number of segments actually indexed.
    pub segment_count: usize,
    /// When the document finished loading.
    pub loaded_at: DateTime<Utc>,
    /// True once chunking, embedding and indexing all completed.
    pub processed: bool,
}
