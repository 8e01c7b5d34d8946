#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{AuditEvent, HeartbeatReport};
use lockin_core::DeviceIdentity;

/// The service that decides whether a code is currently valid.
///
/// Every call carries the device identity that authenticates the device.
/// Implementations own the wire format; callers only see verdicts and
/// [`NetworkError`](crate::NetworkError)s.
pub trait RemoteAuthority: Send {
    /// Ask whether `code` is valid right now.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout or transport failure. A rejected code is
    /// `Ok(false)`, never an error.
    async fn validate(&self, identity: &DeviceIdentity, code: &str) -> Result<bool>;

    /// Report liveness.
    ///
    /// # Errors
    ///
    /// Returns an error if the report was not acknowledged.
    async fn heartbeat(&self, identity: &DeviceIdentity, report: &HeartbeatReport) -> Result<()>;

    /// Record an audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery failed. Callers treat this as best-effort
    /// and ignore the result.
    async fn log_event(&self, identity: &DeviceIdentity, event: &AuditEvent) -> Result<()>;
}

/// The device's local network link.
pub trait NetworkLink: Send {
    /// (Re)associate with the network.
    ///
    /// # Errors
    ///
    /// Returns an error if association failed.
    async fn associate(&mut self) -> Result<()>;

    /// Passive link status as reported by the radio.
    fn is_associated(&self) -> bool;

    /// Received signal strength in dBm.
    fn signal_strength(&self) -> i32;

    fn mac_address(&self) -> String;
}
