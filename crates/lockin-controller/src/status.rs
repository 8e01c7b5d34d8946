use lockin_core::LockState;
use serde::Serialize;

/// Point-in-time view of the device, as printed by the `status` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub lock_state: LockState,
    pub online: bool,
    pub paired: bool,
    pub attempt_count: u32,
    /// Zero when no lockout window is open
    pub lockout_remaining_secs: u64,
    /// Received signal strength in dBm
    pub signal_strength: i32,
    pub mac_address: String,
    pub uptime_secs: u64,
    pub firmware_version: String,
}
