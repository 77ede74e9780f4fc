//! Unified error handling for `llm-service`.
//!
//! One top-level [`LlmError`] for the whole crate, with configuration
//! problems grouped in [`ConfigError`]. The important extra over a plain
//! error enum is [`LlmError::is_retryable`]: callers drive retry decisions
//! from that classification instead of matching status codes themselves.
//!
//! All messages carry the `[LLM Service]` suffix to simplify attribution in
//! logs.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the crate.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Top-level error for `llm-service` operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration/validation errors (startup time).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (connect, timeout, TLS, body read).
    #[error("[LLM Service] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[LLM Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL (without the key query parameter).
        url: String,
        /// Short message extracted from the response body.
        snippet: String,
    },

    /// Response body could not be decoded into the expected shape.
    #[error("[LLM Service] failed to decode response: {0}")]
    Decode(String),
}

impl LlmError {
    /// Whether a failed call may succeed if repeated.
    ///
    /// Rate limiting (429) and server-side faults (5xx) are transient;
    /// transport timeouts and refused connections are treated the same way.
    /// Everything else (auth, malformed request, decode) is terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::HttpStatus { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            LlmError::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (timeouts, retry bounds).
    #[error("[LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `GEMINI_ENDPOINT`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },
}

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a
/// valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            LlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] otherwise.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_status(status: StatusCode) -> LlmError {
        LlmError::HttpStatus {
            status,
            url: "http://example/embed".into(),
            snippet: String::new(),
        }
    }

    #[test]
    fn rate_limit_and_server_errors_are_retryable() {
        assert!(http_status(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(http_status(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(http_status(StatusCode::SERVICE_UNAVAILABLE).is_retryable());
    }

    #[test]
    fn client_errors_are_terminal() {
        assert!(!http_status(StatusCode::BAD_REQUEST).is_retryable());
        assert!(!http_status(StatusCode::UNAUTHORIZED).is_retryable());
        assert!(!http_status(StatusCode::NOT_FOUND).is_retryable());
        assert!(!LlmError::Decode("truncated body".into()).is_retryable());
        assert!(!LlmError::from(ConfigError::MissingVar("GEMINI_API_KEY")).is_retryable());
    }
}
