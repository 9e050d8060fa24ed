//! Retry with exponential backoff
//!
//! [`retry_with_backoff`] repeats an async operation while its error
//! classifies as [`RetryClass::Retryable`], sleeping on the tokio clock between
//! attempts. It knows nothing about extraction and can wrap any remote call.
//!
//! [`RetryClass::Retryable`]: mindmap_domain::traits::RetryClass::Retryable

use mindmap_domain::traits::Classify;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Attempt bound and delay schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first; at least 1
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Factor applied to the delay after each retry
    pub multiplier: u32,
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is raised to 1 if zero
    pub fn new(max_attempts: u32, initial_delay: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            multiplier,
        }
    }

    /// Delay before retry number `retry` (1-based): `initial × multiplier^(retry-1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use mindmap_extractor::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(4, Duration::from_secs(1), 2);
    /// assert_eq!(policy.delay_for(3), Duration::from_secs(4));
    /// ```
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(retry.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }
}

/// Successful result with the retry history that led to it
#[derive(Debug, Clone, PartialEq)]
pub struct Retried<T> {
    /// The operation's value
    pub value: T,
    /// Attempts made, including the successful one
    pub attempts: u32,
    /// Delays slept before each retry, in order
    pub delays: Vec<Duration>,
}

/// Why [`retry_with_backoff`] gave up
#[derive(Debug, Clone, PartialEq)]
pub enum RetryError<E> {
    /// A non-retryable error ended the loop early
    Fatal {
        /// The error
        error: E,
        /// Attempts made, including the failing one
        attempts: u32,
    },
    /// The attempt bound was reached on retryable errors
    Exhausted {
        /// Error of the final attempt
        last: E,
        /// Attempts made
        attempts: u32,
    },
}

/// Run `operation` until it succeeds, fails fatally, or runs out of attempts
///
/// `operation` receives the 1-based attempt number.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<Retried<T>, RetryError<E>>
where
    E: Classify + Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delays = Vec::new();
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return Ok(Retried {
                    value,
                    attempts: attempt,
                    delays,
                })
            }
            Err(error) if !error.is_retryable() => {
                warn!(attempt, error = %error, "non-retryable failure");
                return Err(RetryError::Fatal {
                    error,
                    attempts: attempt,
                });
            }
            Err(error) if attempt >= max_attempts => {
                warn!(attempt, error = %error, "retries exhausted");
                return Err(RetryError::Exhausted {
                    last: error,
                    attempts: attempt,
                });
            }
            Err(error) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "transient failure; backing off"
                );
                delays.push(delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
