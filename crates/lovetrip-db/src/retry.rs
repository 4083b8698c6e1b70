//! Retry with exponential backoff for transient store failures.
//!
//! [`retry_with_backoff`] wraps a fallible async operation and retries only
//! errors classified as transient by [`is_transient`]. Classification is done
//! on structured error variants, never by inspecting message text: retrying a
//! permanently-failing write wastes the backoff budget and delays legitimate
//! failure reporting.

use std::future::Future;
use std::time::Duration;

use crate::DbError;

/// Attempt budget and backoff base for store writes.
///
/// With the defaults (5 attempts, 2s base) a persistently failing transient
/// operation waits 2s, 4s, 8s, and 16s between attempts, roughly 30s total,
/// before the final error is returned.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Clamped to at least 1.
    pub max_attempts: u32,
    /// Base delay in milliseconds; doubles after each failed attempt.
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_attempts,
            backoff_base_ms,
        }
    }
}

/// Returns `true` for errors worth retrying after a backoff delay.
///
/// **Retriable:** network-level I/O failures, pool acquire timeouts, and a
/// crashed pool worker; these are the conditions a flaky connection produces.
///
/// **Not retriable:** everything else, notably database-side rejections
/// (constraint violations, bad payloads), `NotFound`, and migration errors;
/// retrying cannot change the outcome.
pub(crate) fn is_transient(err: &DbError) -> bool {
    match err {
        DbError::Sqlx(e) => matches!(
            e,
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::WorkerCrashed
        ),
        DbError::NotFound
        | DbError::InvalidSyncRunTransition { .. }
        | DbError::Migration(_) => false,
    }
}

/// Runs `operation` up to `policy.max_attempts` times, sleeping between
/// attempts with a doubling delay. Non-transient errors are returned
/// immediately without any retry.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_transient(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay_ms = policy
                    .backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms,
                    error = %err,
                    "transient store error; retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn transient_err() -> DbError {
        DbError::Sqlx(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )))
    }

    #[test]
    fn io_and_pool_errors_are_transient() {
        assert!(is_transient(&transient_err()));
        assert!(is_transient(&DbError::Sqlx(sqlx::Error::PoolTimedOut)));
    }

    #[test]
    fn not_found_is_not_transient() {
        assert!(!is_transient(&DbError::NotFound));
    }

    #[test]
    fn row_level_errors_are_not_transient() {
        assert!(!is_transient(&DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::new(5, 0), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, DbError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_error_is_retried_up_to_the_attempt_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::new(5, 0), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(transient_err())
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 5, "5 attempts total");
    }

    #[tokio::test]
    async fn transient_error_then_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::new(5, 0), || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(transient_err())
                } else {
                    Ok::<u32, DbError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_error_is_never_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::new(5, 0), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(DbError::Sqlx(sqlx::Error::RowNotFound))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "non-transient errors must fail immediately"
        );
    }

    #[tokio::test]
    async fn zero_max_attempts_still_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::new(0, 0), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, DbError>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
