//! Bounded exponential-backoff retry, shared by the sandbox pool's spawn
//! path and the execution engine's `execute` call.

use std::future::Future;
use std::time::Duration;

/// Default attempt count for bounded retries (spec: 3 attempts).
pub const DEFAULT_ATTEMPTS: u32 = 3;
/// Default base delay before the first retry (spec: 1s).
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Default delay cap (spec: 10s).
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Runs `attempt` up to `attempts` times, doubling the delay between
/// retries starting at `base_delay` and never exceeding `max_delay`.
///
/// Retries only when `is_retryable` returns `true` for the error; a
/// non-retryable error (or exhausting all attempts) returns immediately.
pub async fn retry<T, E, F, Fut>(
    attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    is_retryable: impl Fn(&E) -> bool,
    mut attempt: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = base_delay;
    let mut last_err = None;

    for attempt_no in 1..=attempts.max(1) {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt_no == attempts || !is_retryable(&err) {
                    return Err(err);
                }
                tracing::warn!(
                    attempt = attempt_no,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis(),
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(max_delay);
                last_err = Some(err);
            }
        }
    }

    // Unreachable in practice (the loop always returns on its last iteration),
    // but kept so the function is total without an `unwrap`.
    #[allow(clippy::expect_used)]
    Err(last_err.expect("retry loop always assigns an error before falling through"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn retry_returns_ok_without_retrying_on_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry(
            3,
            Duration::from_millis(1),
            Duration::from_millis(10),
            |_: &&str| true,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            },
        )
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_retries_up_to_attempt_limit() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry(
            3,
            Duration::from_millis(1),
            Duration::from_millis(10),
            |_: &&str| true,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("transient") }
            },
        )
        .await;
        assert_eq!(result, Err("transient"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_stops_immediately_on_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry(
            3,
            Duration::from_millis(1),
            Duration::from_millis(10),
            |_: &&str| false,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("fatal") }
            },
        )
        .await;
        assert_eq!(result, Err("fatal"));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "non-retryable error must not retry");
    }

    #[tokio::test]
    async fn retry_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry(
            3,
            Duration::from_millis(1),
            Duration::from_millis(10),
            |_: &&str| true,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { if n < 2 { Err("transient") } else { Ok(7) } }
            },
        )
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
