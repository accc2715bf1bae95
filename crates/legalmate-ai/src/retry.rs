//! Retry and timeout helpers around a single external call.
//!
//! Backoff delays come from [`RetryPolicy::delay`] with no jitter, so tests
//! running on tokio's paused clock observe exact schedules.

use std::future::Future;
use std::time::Duration;

use legalmate_core::RetryPolicy;
use tracing::{debug, warn};

use crate::ServiceError;

/// Bound a call by `limit`. Expiry becomes [`ServiceError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ServiceError::Timeout(limit))?
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// Returns the last error on exhaustion.
pub async fn with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt < attempts => {
                let delay = policy.delay(attempt);
                warn!(
                    operation,
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "external call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(operation, attempt, error = %e, "external call failed, giving up");
                return Err(e);
            }
        }
    }
}
