//! Gemini configuration loaded strictly from environment variables.
//!
//! One config covers both roles the backend plays for us (embedding and
//! chat generation); the two model names are separate because Google ships
//! them as distinct models.
//!
//! # Environment variables
//!
//! - `GEMINI_API_KEY`    = API key (mandatory)
//! - `GEMINI_ENDPOINT`   = base URL (default `https://generativelanguage.googleapis.com`)
//! - `GEMINI_EMBED_MODEL` = embedding model (default `text-embedding-004`)
//! - `GEMINI_CHAT_MODEL` = generation model (default `gemini-2.5-flash`)
//! - `LLM_TIMEOUT_SECS`  = per-request timeout (default 60)

use crate::error::{Result, env_opt_u64, must_env, validate_http_endpoint};

/// Default public endpoint of the Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default embedding model.
pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-004";

/// Default generation model.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for [`crate::GeminiService`].
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Base URL of the API (no trailing slash required).
    pub endpoint: String,
    /// Model identifier used for `embedContent`.
    pub embed_model: String,
    /// Model identifier used for `generateContent`.
    pub chat_model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Builds a config from environment variables.
    ///
    /// # Errors
    /// - [`crate::ConfigError::MissingVar`] if `GEMINI_API_KEY` is unset
    /// - [`crate::ConfigError::InvalidFormat`] if the endpoint is not HTTP(S)
    /// - [`crate::ConfigError::InvalidNumber`] if the timeout fails to parse
    pub fn from_env() -> Result<Self> {
        let api_key = must_env("GEMINI_API_KEY")?;
        let endpoint = std::env::var("GEMINI_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        validate_http_endpoint("GEMINI_ENDPOINT", &endpoint)?;

        let embed_model = env_or("GEMINI_EMBED_MODEL", DEFAULT_EMBED_MODEL);
        let chat_model = env_or("GEMINI_CHAT_MODEL", DEFAULT_CHAT_MODEL);
        let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(60);

        Ok(Self {
            api_key,
            endpoint,
            embed_model,
            chat_model,
            timeout_secs,
        })
    }
}

fn env_or(name: &str, dflt: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}
