//! Deadline wrapper for async operations
//!
//! Bounds a single future to a deadline, converting expiry into `None`
//! instead of an error. The wrapped future is dropped when the deadline
//! fires, so any partial work it performed is discarded. No retry happens
//! here; retries are a caller concern.

use std::future::Future;
use std::time::Duration;

/// Wait for `fut` up to `limit`. Returns `Some(output)` on completion,
/// `None` if the deadline elapses first.
pub async fn with_timeout<F, T>(fut: F, limit: Duration) -> Option<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}
