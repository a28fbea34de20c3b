//! Retry-with-backoff wrapper around opening a database connection.
//!
//! Only connection establishment is retried. Once a connection is handed out,
//! a failing query surfaces directly to the caller.

use crate::domain::{GovernanceError, SleeperPtr, TokioSleeper};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Fixed-attempt, fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total connection attempts, including the first. Treated as at least 1.
    pub max_attempts: u32,
    /// Pause between consecutive attempts. No pause follows the last attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

#[derive(Clone)]
pub struct ConnectionAcquirer {
    policy: RetryPolicy,
    sleeper: SleeperPtr,
}

impl ConnectionAcquirer {
    // ---
    pub fn new(policy: RetryPolicy, sleeper: SleeperPtr) -> Self {
        Self { policy, sleeper }
    }

    /// Acquirer that backs off on the tokio timer.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self::new(policy, Arc::new(TokioSleeper))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Calls `connect` until it succeeds or the policy is exhausted.
    ///
    /// Each attempt is independent. Success returns immediately without
    /// further delay.
    ///
    /// # Errors
    /// Returns [`GovernanceError::ConnectionUnavailable`] carrying the last
    /// failure once every attempt has failed.
    pub async fn acquire<C, E, F, Fut>(&self, mut connect: F) -> Result<C, GovernanceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<C, E>>,
        E: Display,
    {
        // ---
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match connect().await {
                Ok(conn) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "database connection established after retry");
                    }
                    return Ok(conn);
                }
                Err(err) => {
                    last_error = err.to_string();
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        error = %last_error,
                        "database connection attempt failed"
                    );
                }
            }

            if attempt < max_attempts {
                self.sleeper.sleep(self.policy.delay).await;
            }
        }

        tracing::error!(
            attempts = max_attempts,
            error = %last_error,
            "database connection unavailable, giving up"
        );
        Err(GovernanceError::ConnectionUnavailable {
            attempts: max_attempts,
            reason: last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::Sleeper;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct RecordingSleeper {
        naps: Mutex<Vec<Duration>>,
    }

    #[async_trait::async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.naps.lock().push(duration);
        }
    }

    fn acquirer() -> (Arc<RecordingSleeper>, ConnectionAcquirer) {
        // ---
        let sleeper = Arc::new(RecordingSleeper::default());
        let acquirer = ConnectionAcquirer::new(RetryPolicy::default(), sleeper.clone());
        (sleeper, acquirer)
    }

    #[tokio::test]
    async fn persistent_failure_makes_exactly_three_attempts() {
        // ---
        let (sleeper, acquirer) = acquirer();
        let attempts = &AtomicU32::new(0);

        let result = acquirer
            .acquire(move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("connection refused")
            })
            .await;

        assert_eq!(
            result.unwrap_err(),
            GovernanceError::ConnectionUnavailable {
                attempts: 3,
                reason: "connection refused".to_string(),
            }
        );
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(*sleeper.naps.lock(), vec![Duration::from_secs(1); 2]);
    }

    #[tokio::test]
    async fn success_on_second_attempt_stops_retrying() {
        // ---
        let (sleeper, acquirer) = acquirer();
        let attempts = &AtomicU32::new(0);

        let conn = acquirer
            .acquire(move || async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 2 {
                    Err("connection refused")
                } else {
                    Ok("conn")
                }
            })
            .await
            .unwrap();

        assert_eq!(conn, "conn");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(sleeper.naps.lock().len(), 1);
    }

    #[tokio::test]
    async fn first_attempt_success_never_sleeps() {
        // ---
        let (sleeper, acquirer) = acquirer();

        let conn = acquirer.acquire(|| async { Ok::<_, String>(42) }).await.unwrap();

        assert_eq!(conn, 42);
        assert!(sleeper.naps.lock().is_empty());
    }

    #[tokio::test]
    async fn zero_attempt_policy_still_tries_once() {
        // ---
        let sleeper = Arc::new(RecordingSleeper::default());
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::from_millis(10),
        };
        let acquirer = ConnectionAcquirer::new(policy, sleeper.clone());
        let attempts = &AtomicU32::new(0);

        let result = acquirer
            .acquire(move || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("down")
            })
            .await;

        assert!(matches!(
            result,
            Err(GovernanceError::ConnectionUnavailable { attempts: 1, .. })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(sleeper.naps.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_backoff_uses_fixed_delay() {
        // ---
        let acquirer = ConnectionAcquirer::with_policy(RetryPolicy::default());
        let before = tokio::time::Instant::now();

        let result = acquirer.acquire(|| async { Err::<(), _>("down") }).await;

        let waited = tokio::time::Instant::now() - before;
        assert!(result.is_err());
        assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(3));
    }
}
