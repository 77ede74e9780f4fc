//! Retry with exponential backoff for transient backend failures.
//!
//! The policy is a plain value: [`Backoff::delay`] is a pure function of the
//! attempt number, and [`retry_with`] is the driver that performs the call,
//! inspects [`crate::LlmError::is_retryable`], and stops at the attempt
//! bound. Callers never catch-and-loop themselves.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::Result;

/// Exponential backoff schedule: `initial`, doubled on every further attempt.
#[derive(Clone, Copy, Debug)]
pub struct Backoff {
    /// Delay before the second attempt.
    pub initial: Duration,
    /// Total number of attempts (first call included). Must be >= 1.
    pub max_attempts: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max_attempts: 3,
        }
    }
}

impl Backoff {
    /// Delay to sleep after the failed attempt with the given 0-based index.
    ///
    /// `delay(0)` is `initial`, `delay(1)` twice that, and so on. Saturates
    /// instead of overflowing for absurd attempt numbers.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.initial
            .saturating_mul(2u32.saturating_pow(attempt.min(31)))
    }

    /// Reads the attempt bound from `EMBED_RETRY_ATTEMPTS` (default 3),
    /// keeping the 1-second initial delay.
    pub fn from_env() -> Self {
        let max_attempts = std::env::var("EMBED_RETRY_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(3);
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

/// Runs `op`, retrying while the failure is retryable and attempts remain.
///
/// Sleeps `policy.delay(attempt)` between attempts. The final error (terminal
/// or exhausted) is returned as-is; the caller decides whether a missing
/// result is fatal.
///
/// # Errors
/// The first terminal error, or the last retryable error once
/// `policy.max_attempts` attempts were spent.
pub async fn retry_with<T, F, Fut>(policy: &Backoff, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_retryable() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay(attempt);
                warn!(
                    "retryable backend failure (attempt {}/{}): {e}; backing off {:?}",
                    attempt + 1,
                    policy.max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
