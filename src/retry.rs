//! Fixed-delay retry
//!
//! Every error is retried the same way: a fixed number of attempts with a
//! fixed pause in between, no backoff and no jitter.

use std::future::Future;
use std::time::Duration;

/// Default number of attempts per dependency
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Default pause between attempts
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1
    pub attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

/// Error returned once every attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryError<E> {
    /// Number of attempts made
    pub attempts: u32,
    /// Error from the last attempt
    pub last: E,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a new policy; `attempts` is clamped to at least 1
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// `on_failure` is called with the attempt number and error after each
    /// failed attempt, including the last one.
    pub async fn run<T, E, F, Fut>(
        &self,
        mut operation: F,
        mut on_failure: impl FnMut(u32, &E),
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    on_failure(attempt, &e);
                    if attempt >= attempts {
                        return Err(RetryError { attempts, last: e });
                    }
                }
            }

            tokio::time::sleep(self.delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[test]
    fn test_attempts_clamped() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts, 1);
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<u32, RetryError<String>> = policy
            .run(
                || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                },
                |_, _| {},
            )
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_after_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result = policy
            .run(
                || async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err(format!("attempt {} failed", n))
                    } else {
                        Ok(n)
                    }
                },
                |_, _| {},
            )
            .await;

        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_with_last_error() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let mut seen = Vec::new();
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<(), _> = policy
            .run(
                || async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(format!("failure {}", n))
                },
                |attempt, _| seen.push(attempt),
            )
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert_eq!(err.last, "failure 3");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        let start = tokio::time::Instant::now();

        let _: Result<(), _> = policy
            .run(|| async { Err::<(), _>("nope") }, |_, _| {})
            .await;

        // Two pauses between three attempts
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
