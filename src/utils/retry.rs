//! Bounded retry with fixed delay and jitter for gateway calls.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// Configuration for retry behavior: a fixed inter-attempt delay plus
/// uniform jitter, bounded by a total attempt count. No exponential
/// growth.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the uniform jitter added to each delay.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_jitter: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    /// Delay before the next attempt: fixed base plus uniform jitter.
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base_delay;
        }
        let jitter = rand::thread_rng().gen_range(0..jitter_ms);
        self.base_delay + Duration::from_millis(jitter)
    }
}

/// One scheduled retry. Local to a single call, used only for logging,
/// never persisted or shared across invocations.
#[derive(Debug)]
pub struct RetryAttempt {
    pub attempt: u32,
    pub error_kind: String,
    pub delay: Duration,
}

/// Retry result indicating what happened.
#[derive(Debug)]
pub enum RetryResult<T, E> {
    /// Operation succeeded.
    Success(T),
    /// Operation failed after all attempts, or on a non-retryable error.
    Failed { last_error: E, attempts: u32 },
}

impl<T, E> RetryResult<T, E> {
    /// Convert to a Result, discarding retry information.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            RetryResult::Success(value) => Ok(value),
            RetryResult::Failed { last_error, .. } => Err(last_error),
        }
    }
}

/// Determines if an error is retryable.
pub trait Retryable {
    /// Returns true if the operation should be retried.
    fn is_retryable(&self) -> bool;
}

/// Execute an async operation under the given retry policy.
///
/// Non-retryable errors fail on the attempt that produced them. Delays
/// use the tokio timer so concurrent tasks keep progressing while this
/// call waits.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> RetryResult<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        match operation().await {
            Ok(value) => return RetryResult::Success(value),
            Err(error) => {
                if attempts >= policy.max_attempts || !error.is_retryable() {
                    return RetryResult::Failed {
                        last_error: error,
                        attempts,
                    };
                }

                let scheduled = RetryAttempt {
                    attempt: attempts,
                    error_kind: error.to_string(),
                    delay: policy.next_delay(),
                };
                tracing::warn!(
                    attempt = scheduled.attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = scheduled.delay.as_millis() as u64,
                    error = %scheduled.error_kind,
                    "retrying gateway call"
                );

                sleep(scheduled.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct TestError(String);

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.0.contains("transient")
        }
    }

    fn quick_policy() -> RetryPolicy {
        RetryPolicy::default()
            .with_base_delay(Duration::from_millis(10))
            .with_max_jitter(Duration::from_millis(0))
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let counter = AtomicU32::new(0);
        let result = with_retry(&quick_policy(), || async {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, TestError>("success")
        })
        .await;

        match result {
            RetryResult::Success(v) => assert_eq!(v, "success"),
            RetryResult::Failed { .. } => panic!("expected success"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_after_retries() {
        let counter = AtomicU32::new(0);
        let result = with_retry(&quick_policy(), || async {
            let count = counter.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                Err(TestError("transient error".to_string()))
            } else {
                Ok("success")
            }
        })
        .await;

        match result {
            RetryResult::Success(v) => assert_eq!(v, "success"),
            RetryResult::Failed { .. } => panic!("expected success"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_once() {
        let counter = AtomicU32::new(0);
        let result = with_retry(&quick_policy(), || async {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(TestError("permanent error".to_string()))
        })
        .await;

        match result {
            RetryResult::Failed { attempts, .. } => assert_eq!(attempts, 1),
            RetryResult::Success(_) => panic!("expected failure"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_after_three_attempts() {
        let counter = AtomicU32::new(0);
        let result = with_retry(&quick_policy(), || async {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(TestError("transient error".to_string()))
        })
        .await;

        match result {
            RetryResult::Failed { attempts, .. } => assert_eq!(attempts, 3),
            RetryResult::Success(_) => panic!("expected failure"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    // Two inter-attempt waits at the default 2s base must accumulate at
    // least 4 seconds before the third attempt fails. Runs on the paused
    // tokio clock so no real time passes.
    #[tokio::test(start_paused = true)]
    async fn test_cumulative_delay_at_default_policy() {
        let policy = RetryPolicy::default();
        let start = tokio::time::Instant::now();

        let result = with_retry(&policy, || async {
            Err::<(), _>(TestError("transient rate limit".to_string()))
        })
        .await;

        match result {
            RetryResult::Failed { attempts, .. } => assert_eq!(attempts, 3),
            RetryResult::Success(_) => panic!("expected failure"),
        }
        assert!(start.elapsed() >= Duration::from_secs(4));
        // Jitter is bounded by 0.5s per wait.
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
