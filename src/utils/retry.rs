use std::future::Future;
use std::time::Duration;
use tracing::warn;
use crate::config::RequestConfig;
use crate::error::{Error, Result};
use crate::utils::time::sleep_with_jitter;

/// Per-attempt timeout, number of re-tries after the first attempt, and the
/// base delay that doubles between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 3,
            backoff: Duration::from_millis(300),
        }
    }
}

impl From<&RequestConfig> for RetryPolicy {
    fn from(request: &RequestConfig) -> Self {
        Self {
            timeout: Duration::from_secs(request.timeout_secs),
            retries: request.retries,
            backoff: Duration::from_millis(request.backoff_ms),
        }
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// `retries` re-tries have been spent. Exhaustion is reported as
/// [`Error::MaxRetriesExceeded`] wrapping the last failure.
pub async fn retry_with_backoff<T, F, Fut>(
    mut retries: u32,
    base_delay_ms: u64,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = base_delay_ms;
    let mut attempts = 0;

    loop {
        attempts += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                if retries == 0 {
                    return Err(Error::MaxRetriesExceeded {
                        attempts,
                        last: Box::new(e),
                    });
                }

                warn!(
                    error = %e,
                    attempt = attempts,
                    delay_ms = delay,
                    "Request failed, retrying"
                );

                retries -= 1;
                sleep_with_jitter(delay, delay / 2).await;
                delay = delay.saturating_mul(2);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn timeout() -> Error {
        Error::Timeout {
            url: "https://api.nhle.com/stats/rest/en/config".into(),
            timeout: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_on_last_allowed_attempt() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(2, 0, || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(timeout())
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_at_first_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff(5, 0, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::validation("nope"))
        })
        .await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_reports_attempts() {
        let result: Result<()> = retry_with_backoff(1, 0, || async { Err(timeout()) }).await;

        match result {
            Err(Error::MaxRetriesExceeded { attempts, last }) => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, Error::Timeout { .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn policy_from_request_config() {
        let policy = RetryPolicy::from(&RequestConfig {
            timeout_secs: 4,
            retries: 1,
            backoff_ms: 50,
        });
        assert_eq!(policy.timeout, Duration::from_secs(4));
        assert_eq!(policy.retries, 1);
        assert_eq!(policy.backoff, Duration::from_millis(50));
    }
}
