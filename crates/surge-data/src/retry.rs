//! Bounded retries with exponential backoff for transient HTTP failures.

use crate::error::DataError;
use std::{future::Future, time::Duration};
use tracing::warn;

/// How often and how patiently to retry a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (default: 3)
    pub retries: u32,

    /// Base delay; retry `n` waits `backoff * 2^(n-1)` (default: 300ms)
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff: Duration::from_millis(300),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based).
    ///
    /// ```
    /// use std::time::Duration;
    /// use surge_data::RetryPolicy;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.delay(1), Duration::from_millis(300));
    /// assert_eq!(policy.delay(3), Duration::from_millis(1200));
    /// ```
    #[must_use]
    pub const fn delay(&self, retry: u32) -> Duration {
        self.backoff
            .saturating_mul(2_u32.saturating_pow(retry.saturating_sub(1)))
    }

    /// Run `op` until it succeeds, fails with an error `retryable` rejects,
    /// or the retries are used up. The last error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt.
    pub async fn run<T, E, F, Fut, R>(&self, retryable: R, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if retry < self.retries && retryable(&err) => {
                    retry += 1;
                    let delay = self.delay(retry);
                    warn!(%err, retry, delay_ms = delay.as_millis(), "transient failure, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Connection failures and timeouts are worth retrying; HTTP status and
/// parse errors are not.
#[must_use]
pub fn is_transient(err: &DataError) -> bool {
    matches!(err, DataError::Request(e) if e.is_connect() || e.is_timeout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Failure {
        Flaky,
        Fatal,
    }

    impl std::fmt::Display for Failure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    const fn quick(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_delay_doubles() {
        let policy = quick(3);
        assert_eq!(policy.delay(1), Duration::from_millis(1));
        assert_eq!(policy.delay(2), Duration::from_millis(2));
        assert_eq!(policy.delay(3), Duration::from_millis(4));
        assert_eq!(RetryPolicy::none().delay(5), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let mut calls = 0;
        let result = quick(3)
            .run(
                |e| *e == Failure::Flaky,
                || {
                    calls += 1;
                    let attempt = calls;
                    async move { if attempt < 3 { Err(Failure::Flaky) } else { Ok(attempt) } }
                },
            )
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let mut calls = 0;
        let result: Result<(), Failure> = quick(3)
            .run(
                |e| *e == Failure::Flaky,
                || {
                    calls += 1;
                    async { Err(Failure::Flaky) }
                },
            )
            .await;

        assert_eq!(result, Err(Failure::Flaky));
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let mut calls = 0;
        let result: Result<(), Failure> = quick(3)
            .run(
                |e| *e == Failure::Flaky,
                || {
                    calls += 1;
                    async { Err(Failure::Fatal) }
                },
            )
            .await;

        assert_eq!(result, Err(Failure::Fatal));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_refused_connection_is_retried() {
        let client = reqwest::Client::new();
        let client = &client;
        let mut calls = 0;
        let result = quick(2)
            .run(is_transient, || {
                calls += 1;
                async move {
                    client
                        .get("http://127.0.0.1:1/constituents.csv")
                        .send()
                        .await
                        .map_err(DataError::from)
                }
            })
            .await;

        assert!(is_transient(&result.unwrap_err()));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_only_request_errors_are_transient() {
        assert!(!is_transient(&DataError::NoSymbolColumn));
        assert!(!is_transient(&DataError::RateLimitExceeded));
    }
}
