//! Timeout enforcement for remote calls.
//!
//! ```text
//! AccessController
//!     │
//!     └─> Bounded<A> ──(timeout)──> A: RemoteAuthority ───> server
//! ```
//!
//! A call that exceeds its bound is dropped and reported as
//! [`NetworkError::Timeout`]; the controller then treats it like any other
//! transport failure.

use crate::error::{NetworkError, Result};
use crate::traits::RemoteAuthority;
use crate::types::{AuditEvent, HeartbeatReport};
use lockin_core::DeviceIdentity;
use std::future::Future;
use std::time::Duration;
use tracing::{trace, warn};

/// Run `operation`, failing with [`NetworkError::Timeout`] if it takes longer than `limit`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lockin_network::{bounded, NetworkError};
///
/// # #[tokio::main]
/// # async fn main() {
/// let result: Result<(), NetworkError> =
///     bounded(Duration::from_millis(10), std::future::pending()).await;
/// assert_eq!(result, Err(NetworkError::Timeout(10)));
/// # }
/// ```
pub async fn bounded<T, F>(limit: Duration, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Remote call timeout after {}ms", limit.as_millis());
            Err(NetworkError::Timeout(limit.as_millis() as u64))
        }
    }
}

/// A [`RemoteAuthority`] whose every call is capped by a timeout.
#[derive(Debug)]
pub struct Bounded<A> {
    inner: A,
    limit: Duration,
}

impl<A> Bounded<A> {
    pub fn new(inner: A, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: RemoteAuthority> RemoteAuthority for Bounded<A> {
    async fn validate(&self, identity: &DeviceIdentity, code: &str) -> Result<bool> {
        trace!("Validating code with remote authority");
        bounded(self.limit, self.inner.validate(identity, code)).await
    }

    async fn heartbeat(&self, identity: &DeviceIdentity, report: &HeartbeatReport) -> Result<()> {
        trace!(lock_state = %report.lock_state, "Sending heartbeat");
        bounded(self.limit, self.inner.heartbeat(identity, report)).await
    }

    async fn log_event(&self, identity: &DeviceIdentity, event: &AuditEvent) -> Result<()> {
        trace!(event_type = %event.event_type, "Logging audit event");
        bounded(self.limit, self.inner.log_event(identity, event)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_passes_through_fast_result() {
        let result = bounded(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_passes_through_error() {
        let result: Result<()> = bounded(Duration::from_secs(1), async {
            Err(NetworkError::Status(500))
        })
        .await;
        assert_eq!(result, Err(NetworkError::Status(500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_stalled_call() {
        let start = tokio::time::Instant::now();
        let result: Result<()> = bounded(Duration::from_secs(3), std::future::pending()).await;

        assert_eq!(result, Err(NetworkError::Timeout(3000)));
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }
}
