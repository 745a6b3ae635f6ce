//! Bounded exponential backoff for page-level fetches.
//!
//! Gateway route handlers never retry; this is only for server-rendered page
//! data, where a brief downstream hiccup should not blank the page.

use std::future::Future;
use std::time::Duration;

use futures::future::{AbortRegistration, Abortable};

use crate::error::{Result, UpstreamError};

/// Retry schedule: `max_attempts` tries, waiting `initial_delay` after the
/// first failure and doubling the wait after each further failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Wait after the first failed attempt.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    /// Create a retry policy.
    #[must_use]
    pub const fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails with a non-retriable error, or the
    /// attempts run out. `op` receives the 1-based attempt number.
    ///
    /// # Errors
    ///
    /// Returns the last error `op` produced.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retriable() && attempt < max_attempts => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Upstream fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Like [`RetryPolicy::run`], but aborting `registration` ends the whole
    /// sequence, including an in-flight attempt or a pending backoff.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` when aborted, otherwise as [`RetryPolicy::run`].
    pub async fn run_abortable<T, F, Fut>(
        &self,
        registration: AbortRegistration,
        op: F,
    ) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match Abortable::new(self.run(op), registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                tracing::debug!("Upstream fetch cancelled by caller");
                Err(UpstreamError::Cancelled)
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}
