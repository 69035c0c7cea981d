//! Async retry utilities with exponential backoff

use std::future::Future;
use std::time::Duration;

/// Default maximum attempts for trace API requests
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay in milliseconds for exponential backoff
pub const DEFAULT_BASE_DELAY_MS: u64 = 100;

/// Longest single wait between attempts
const MAX_DELAY_MS: u64 = 10_000;

/// Retry an async operation with exponential backoff.
///
/// Only errors for which `is_transient` returns true are retried; anything
/// else is returned immediately. Returns the value of the first successful
/// attempt, or the last error once `max_attempts` is exhausted.
pub async fn retry_with_backoff_async<T, E, F, Fut, P>(
    max_attempts: u32,
    base_delay_ms: u64,
    is_transient: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempts >= max_attempts || !is_transient(&e) {
                    return Err(e);
                }
                let delay = backoff_delay(base_delay_ms, attempts);
                tracing::warn!(
                    error = %e,
                    attempt = attempts,
                    delay_ms = delay.as_millis(),
                    "Retrying after transient error"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Delay before the retry following `attempt`, doubling up to `MAX_DELAY_MS`
fn backoff_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(base_delay_ms.saturating_mul(factor).min(MAX_DELAY_MS))
}
