//! Exponential backoff around a generation attempt.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

use crate::error::LlmError;

/// One request, no retries.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// Run `attempt` up to `max_attempts` times.
///
/// Only errors for which [`LlmError::is_retryable`] holds are retried;
/// anything else is returned as is. With `max_attempts <= 1` the single
/// attempt's error is returned unwrapped, otherwise exhaustion yields
/// [`LlmError::RetriesExhausted`].
pub async fn retry_with_backoff<T, Fut, F>(max_attempts: u32, mut attempt: F) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;
    loop {
        attempts += 1;

        let error = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if max_attempts == 1 || !error.is_retryable() {
            return Err(error);
        }
        if attempts >= max_attempts {
            return Err(LlmError::RetriesExhausted {
                attempts,
                last: Box::new(error),
            });
        }

        warn!("Attempt {}/{} failed: {}", attempts, max_attempts, error);
        if let Some(wait) = backoff.next_backoff() {
            tokio::time::sleep(wait).await;
        }
    }
}
