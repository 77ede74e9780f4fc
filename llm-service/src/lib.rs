//! Gemini backend client: embeddings and non-streaming text generation.
//!
//! This crate is the only place that speaks the Generative Language REST
//! dialect. It exposes:
//! - [`GeminiService`] — `embedContent` / `generateContent` over one
//!   `reqwest::Client`
//! - [`LlmError`] — unified error type with a retryable/terminal split
//! - [`Backoff`] + [`retry::retry_with`] — explicit retry policy for
//!   transient backend faults
//!
//! Construct the service once and share it (`Arc`) between the embedding and
//! generation call sites.

pub mod config;
pub mod error;
pub mod gemini;
pub mod retry;

pub use config::GeminiConfig;
pub use error::{ConfigError, LlmError};
pub use gemini::{EmbedIntent, GeminiService};
pub use retry::Backoff;
