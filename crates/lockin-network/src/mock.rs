//! Scripted network collaborators for tests and the bench simulator.
//!
//! [`MockAuthority`] answers according to a [`Verdict`] that can be changed
//! at any time through its handle, and records every call it receives.
//! [`MockLink`] simulates Wi-Fi association.

use crate::error::{NetworkError, Result};
use crate::traits::{NetworkLink, RemoteAuthority};
use crate::types::{AuditEvent, HeartbeatReport};
use lockin_core::DeviceIdentity;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// How the mock authority answers validation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every code is valid.
    AcceptAll,
    /// Every code is invalid.
    RejectAll,
    /// Only the listed codes are valid.
    AcceptCodes(Vec<String>),
    /// Never answer; only a caller-side timeout ends the call.
    Stall,
    /// Fail every call with a transport error.
    Unreachable,
}

#[derive(Debug)]
struct AuthorityState {
    verdict: Verdict,
    heartbeat_ok: bool,
    events_ok: bool,
    validated: Vec<String>,
    identities: Vec<DeviceIdentity>,
    heartbeats: Vec<HeartbeatReport>,
    events: Vec<AuditEvent>,
}

/// Scripted remote authority.
#[derive(Debug, Clone)]
pub struct MockAuthority {
    state: Arc<Mutex<AuthorityState>>,
}

impl MockAuthority {
    /// Create a mock authority and a handle for scripting and inspection.
    pub fn new(verdict: Verdict) -> (Self, MockAuthorityHandle) {
        let state = Arc::new(Mutex::new(AuthorityState {
            verdict,
            heartbeat_ok: true,
            events_ok: true,
            validated: Vec::new(),
            identities: Vec::new(),
            heartbeats: Vec::new(),
            events: Vec::new(),
        }));
        let authority = Self {
            state: Arc::clone(&state),
        };
        (authority, MockAuthorityHandle { state })
    }

    fn state(&self) -> MutexGuard<'_, AuthorityState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_verdict(&self) -> Verdict {
        self.state().verdict.clone()
    }
}

impl RemoteAuthority for MockAuthority {
    async fn validate(&self, identity: &DeviceIdentity, code: &str) -> Result<bool> {
        {
            let mut state = self.state();
            state.validated.push(code.to_string());
            state.identities.push(identity.clone());
        }

        match self.current_verdict() {
            Verdict::AcceptAll => Ok(true),
            Verdict::RejectAll => Ok(false),
            Verdict::AcceptCodes(codes) => Ok(codes.iter().any(|c| c == code)),
            Verdict::Stall => std::future::pending().await,
            Verdict::Unreachable => Err(NetworkError::transport("connection refused")),
        }
    }

    async fn heartbeat(&self, _identity: &DeviceIdentity, report: &HeartbeatReport) -> Result<()> {
        let (verdict, heartbeat_ok) = {
            let mut state = self.state();
            state.heartbeats.push(report.clone());
            (state.verdict.clone(), state.heartbeat_ok)
        };

        match verdict {
            Verdict::Stall => std::future::pending().await,
            Verdict::Unreachable => Err(NetworkError::transport("connection refused")),
            _ if !heartbeat_ok => Err(NetworkError::Status(500)),
            _ => Ok(()),
        }
    }

    async fn log_event(&self, _identity: &DeviceIdentity, event: &AuditEvent) -> Result<()> {
        debug!(event_type = %event.event_type, "Mock authority received event");
        let (verdict, events_ok) = {
            let mut state = self.state();
            state.events.push(event.clone());
            (state.verdict.clone(), state.events_ok)
        };

        match verdict {
            Verdict::Stall => std::future::pending().await,
            Verdict::Unreachable => Err(NetworkError::transport("connection refused")),
            _ if !events_ok => Err(NetworkError::Status(503)),
            _ => Ok(()),
        }
    }
}

/// Handle for scripting and inspecting a [`MockAuthority`].
#[derive(Debug, Clone)]
pub struct MockAuthorityHandle {
    state: Arc<Mutex<AuthorityState>>,
}

impl MockAuthorityHandle {
    fn state(&self) -> MutexGuard<'_, AuthorityState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_verdict(&self, verdict: Verdict) {
        self.state().verdict = verdict;
    }

    /// Make heartbeats fail with a server error while validation keeps working.
    pub fn set_heartbeat_ok(&self, ok: bool) {
        self.state().heartbeat_ok = ok;
    }

    /// Make audit logging fail with a server error while validation keeps working.
    pub fn set_events_ok(&self, ok: bool) {
        self.state().events_ok = ok;
    }

    pub fn validate_calls(&self) -> usize {
        self.state().validated.len()
    }

    /// Codes received by `validate`, oldest first.
    pub fn validated_codes(&self) -> Vec<String> {
        self.state().validated.clone()
    }

    /// Identity presented with the most recent validation.
    pub fn last_identity(&self) -> Option<DeviceIdentity> {
        self.state().identities.last().cloned()
    }

    pub fn heartbeats(&self) -> Vec<HeartbeatReport> {
        self.state().heartbeats.clone()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.state().events.clone()
    }
}

#[derive(Debug)]
struct LinkState {
    associated: bool,
    reachable: bool,
    associate_calls: usize,
    signal_strength: i32,
    mac_address: String,
}

/// Simulated Wi-Fi link.
#[derive(Debug, Clone)]
pub struct MockLink {
    state: Arc<Mutex<LinkState>>,
}

impl MockLink {
    /// Create an unassociated link whose access point is reachable.
    pub fn new() -> (Self, MockLinkHandle) {
        let state = Arc::new(Mutex::new(LinkState {
            associated: false,
            reachable: true,
            associate_calls: 0,
            signal_strength: -55,
            mac_address: "24:6F:28:00:00:01".to_string(),
        }));
        let link = Self {
            state: Arc::clone(&state),
        };
        (link, MockLinkHandle { state })
    }

    fn state(&self) -> MutexGuard<'_, LinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NetworkLink for MockLink {
    async fn associate(&mut self) -> Result<()> {
        let mut state = self.state();
        state.associate_calls += 1;
        state.associated = state.reachable;
        if state.associated {
            Ok(())
        } else {
            Err(NetworkError::disconnected("access point not found"))
        }
    }

    fn is_associated(&self) -> bool {
        self.state().associated
    }

    fn signal_strength(&self) -> i32 {
        self.state().signal_strength
    }

    fn mac_address(&self) -> String {
        self.state().mac_address.clone()
    }
}

/// Handle for controlling a [`MockLink`].
#[derive(Debug, Clone)]
pub struct MockLinkHandle {
    state: Arc<Mutex<LinkState>>,
}

impl MockLinkHandle {
    fn state(&self) -> MutexGuard<'_, LinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the access point (un)reachable for future association attempts.
    pub fn set_reachable(&self, reachable: bool) {
        self.state().reachable = reachable;
    }

    /// Drop the current association, as if the access point vanished.
    pub fn drop_association(&self) {
        self.state().associated = false;
    }

    pub fn set_signal_strength(&self, dbm: i32) {
        self.state().signal_strength = dbm;
    }

    pub fn associate_calls(&self) -> usize {
        self.state().associate_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockin_core::AuditEventType;

    fn identity() -> DeviceIdentity {
        DeviceIdentity::new("T1").unwrap()
    }

    #[tokio::test]
    async fn test_accept_codes_verdict() {
        let (authority, handle) = MockAuthority::new(Verdict::AcceptCodes(vec!["1234".into()]));

        assert!(authority.validate(&identity(), "1234").await.unwrap());
        assert!(!authority.validate(&identity(), "0000").await.unwrap());
        assert_eq!(handle.validated_codes(), vec!["1234", "0000"]);
        assert_eq!(handle.last_identity(), Some(identity()));
    }

    #[tokio::test]
    async fn test_unreachable_fails_all_calls() {
        let (authority, handle) = MockAuthority::new(Verdict::Unreachable);

        assert!(authority.validate(&identity(), "1234").await.is_err());
        let event = AuditEvent::bare(AuditEventType::ManualUnlock);
        assert!(authority.log_event(&identity(), &event).await.is_err());
        assert_eq!(handle.events().len(), 1);
    }

    #[tokio::test]
    async fn test_heartbeat_failure_toggle() {
        let (authority, handle) = MockAuthority::new(Verdict::AcceptAll);
        let report = HeartbeatReport {
            lock_state: lockin_core::LockState::Locked,
            signal_strength: -40,
            uptime_secs: 1,
            firmware_version: "test".into(),
            mac_address: "00:00:00:00:00:00".into(),
        };

        assert!(authority.heartbeat(&identity(), &report).await.is_ok());
        handle.set_heartbeat_ok(false);
        assert_eq!(
            authority.heartbeat(&identity(), &report).await,
            Err(NetworkError::Status(500))
        );
        assert_eq!(handle.heartbeats().len(), 2);
    }

    #[tokio::test]
    async fn test_link_association() {
        let (mut link, handle) = MockLink::new();
        assert!(!link.is_associated());

        link.associate().await.unwrap();
        assert!(link.is_associated());

        handle.drop_association();
        handle.set_reachable(false);
        assert!(!link.is_associated());
        assert!(link.associate().await.is_err());
        assert_eq!(handle.associate_calls(), 2);
    }
}
