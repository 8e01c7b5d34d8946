use crate::{Result, constants::MAX_IDENTITY_LEN, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Credential token proving this device's registration with the remote authority.
///
/// An empty token means the device is unpaired. The token format is opaque to
/// the controller; only its length is bounded by the persisted slot size.
///
/// # Security
/// Comparison is constant-time and the `Debug` output never contains the token.
#[derive(Clone, Default, Eq)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    /// Create a new identity from a token.
    ///
    /// # Errors
    /// Returns `Error::Persistence` if the token does not fit the identity slot
    /// (more than [`MAX_IDENTITY_LEN`] bytes).
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.len() > MAX_IDENTITY_LEN {
            return Err(Error::persistence(format!(
                "Identity token is {} bytes, slot holds at most {MAX_IDENTITY_LEN}",
                token.len()
            )));
        }
        Ok(Self(token))
    }

    /// The identity of a device that has never been paired.
    #[must_use]
    pub fn unpaired() -> Self {
        Self(String::new())
    }

    /// Whether this identity carries a token.
    #[must_use]
    pub fn is_paired(&self) -> bool {
        !self.0.is_empty()
    }

    /// Get the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for DeviceIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_paired() {
            write!(f, "DeviceIdentity(<redacted {} bytes>)", self.0.len())
        } else {
            write!(f, "DeviceIdentity(<unpaired>)")
        }
    }
}

/// Position of the bolt.
///
/// The device boots `Locked`; `Unlocked` always expires back to `Locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    #[default]
    Locked,
    Unlocked,
}

impl LockState {
    /// Wire name used in heartbeat reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a submission was refused without a verdict from the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineCause {
    /// No identity token has been provisioned.
    Unpaired,
    /// Connectivity was already known to be down.
    Disconnected,
    /// The validation request timed out or failed in transport.
    Transport,
}

impl fmt::Display for OfflineCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = match self {
            Self::Unpaired => "device is not paired",
            Self::Disconnected => "network is down",
            Self::Transport => "validation request failed",
        };
        f.write_str(cause)
    }
}

/// Result of a code submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The remote authority accepted the code and the bolt was released.
    Unlocked,
    /// The remote authority rejected the code.
    Rejected,
    /// Lockout is active (or was just triggered by this submission).
    LockedOut,
    /// No verdict could be obtained; attempt counters are untouched.
    OfflineRejected(OfflineCause),
}

impl Outcome {
    /// The indicator signal shown to the person at the device.
    ///
    /// Each outcome maps to exactly one signal so "wrong code", "too many
    /// attempts" and "no connectivity" stay distinguishable.
    pub fn signal(&self) -> Signal {
        match self {
            Self::Unlocked => Signal::Unlocked,
            Self::Rejected => Signal::Error,
            Self::LockedOut => Signal::Lockout,
            Self::OfflineRejected(_) => Signal::Warning,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked)
    }

    /// Convert a refusal into the matching error, `None` for an unlock.
    pub fn into_error(self, remaining_secs: u64) -> Option<Error> {
        match self {
            Self::Unlocked => None,
            Self::Rejected => Some(Error::ValidationRejected),
            Self::LockedOut => Some(Error::LockedOut { remaining_secs }),
            Self::OfflineRejected(cause) => Some(Error::offline(cause.to_string())),
        }
    }
}

/// Abstract feedback state emitted to the indicator sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Locked,
    Unlocked,
    /// Single failed attempt.
    Error,
    /// Escalated failure: lockout triggered or still active.
    Lockout,
    /// Infrastructure problem (offline, unpaired, transport failure).
    Warning,
    Pairing,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Error => "error",
            Self::Lockout => "lockout",
            Self::Warning => "warning",
            Self::Pairing => "pairing",
        };
        f.write_str(name)
    }
}

/// Audit event kinds reported to the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    UnlockSuccess,
    UnlockFail,
    ManualUnlock,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnlockSuccess => "unlock_success",
            Self::UnlockFail => "unlock_fail",
            Self::ManualUnlock => "manual_unlock",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_identity_unpaired_by_default() {
        assert!(!DeviceIdentity::default().is_paired());
        assert!(!DeviceIdentity::unpaired().is_paired());
        assert!(DeviceIdentity::new("sk_live_abc").unwrap().is_paired());
    }

    #[test]
    fn test_identity_length_bound() {
        assert!(DeviceIdentity::new("a".repeat(MAX_IDENTITY_LEN)).is_ok());

        let err = DeviceIdentity::new("a".repeat(MAX_IDENTITY_LEN + 1)).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }

    #[test]
    fn test_identity_debug_is_redacted() {
        let identity = DeviceIdentity::new("sk_live_secret").unwrap();
        let debug = format!("{identity:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("14 bytes"));
    }

    #[test]
    fn test_identity_equality() {
        let a = DeviceIdentity::new("T1").unwrap();
        assert_eq!(a, DeviceIdentity::new("T1").unwrap());
        assert_ne!(a, DeviceIdentity::new("T2").unwrap());
    }

    #[rstest]
    #[case(Outcome::Unlocked, Signal::Unlocked)]
    #[case(Outcome::Rejected, Signal::Error)]
    #[case(Outcome::LockedOut, Signal::Lockout)]
    #[case(Outcome::OfflineRejected(OfflineCause::Unpaired), Signal::Warning)]
    #[case(Outcome::OfflineRejected(OfflineCause::Transport), Signal::Warning)]
    fn test_outcome_signal(#[case] outcome: Outcome, #[case] signal: Signal) {
        assert_eq!(outcome.signal(), signal);
    }

    #[test]
    fn test_outcome_into_error() {
        assert_eq!(Outcome::Unlocked.into_error(0), None);
        assert_eq!(
            Outcome::LockedOut.into_error(30),
            Some(Error::LockedOut { remaining_secs: 30 })
        );
        assert!(matches!(
            Outcome::OfflineRejected(OfflineCause::Disconnected).into_error(0),
            Some(Error::Offline { .. })
        ));
    }

    #[test]
    fn test_lock_state_wire_names() {
        assert_eq!(LockState::default(), LockState::Locked);
        assert_eq!(LockState::Unlocked.to_string(), "unlocked");
        let json = serde_json::to_string(&LockState::Locked).unwrap();
        assert_eq!(json, "\"locked\"");
    }

    #[test]
    fn test_audit_event_names() {
        assert_eq!(AuditEventType::UnlockSuccess.as_str(), "unlock_success");
        assert_eq!(AuditEventType::UnlockFail.as_str(), "unlock_fail");
        assert_eq!(AuditEventType::ManualUnlock.as_str(), "manual_unlock");
    }
}
