use chrono::{DateTime, Utc};
use lockin_core::{AuditEventType, LockState};
use serde::{Deserialize, Serialize};

/// Free-form key/value metadata attached to an audit event.
pub type EventMetadata = serde_json::Map<String, serde_json::Value>;

/// Liveness report sent on every heartbeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatReport {
    pub lock_state: LockState,

    /// Received signal strength in dBm
    pub signal_strength: i32,

    pub uptime_secs: u64,

    pub firmware_version: String,

    pub mac_address: String,
}

/// Audit record reported to the remote authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub event_type: AuditEventType,

    pub metadata: EventMetadata,

    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Create an event stamped with the current wall-clock time.
    pub fn new(event_type: AuditEventType, metadata: EventMetadata) -> Self {
        Self {
            event_type,
            metadata,
            occurred_at: Utc::now(),
        }
    }

    /// Create an event with no metadata.
    pub fn bare(event_type: AuditEventType) -> Self {
        Self::new(event_type, EventMetadata::new())
    }
}
