//! Default policy and timing constants for the lock controller.
//!
//! These values are the factory defaults used by [`ControllerConfig`]. Every
//! one of them can be overridden at runtime through configuration.
//!
//! # Usage
//!
//! ```
//! use lockin_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(DEFAULT_MAX_ATTEMPTS, 5);
//! let penalty = Duration::from_secs(DEFAULT_LOCKOUT_SECS);
//! assert_eq!(penalty.as_secs(), 15 * 60);
//! ```
//!
//! [`ControllerConfig`]: crate::ControllerConfig

// ============================================================================
// Code Entry
// ============================================================================

/// Number of characters in an access code.
///
/// The input layer rejects anything of a different length before it reaches
/// the controller.
pub const DEFAULT_CODE_LENGTH: usize = 6;

// ============================================================================
// Lockout Policy
// ============================================================================

/// Consecutive failed validations that trigger a lockout.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Lockout penalty in seconds (15 minutes).
pub const DEFAULT_LOCKOUT_SECS: u64 = 900;

// ============================================================================
// Timing
// ============================================================================

/// How long the bolt stays released before the automatic relock, in milliseconds.
pub const DEFAULT_UNLOCK_MS: u64 = 5_000;

/// Interval between liveness reports to the remote authority, in seconds.
pub const DEFAULT_HEARTBEAT_SECS: u64 = 60;

/// Upper bound on any single remote call, in milliseconds.
///
/// Must stay strictly below [`DEFAULT_UNLOCK_MS`] so a stalled request can
/// never hold the bolt open past its relock deadline.
pub const DEFAULT_NETWORK_TIMEOUT_MS: u64 = 3_000;

/// Minimum spacing between network reassociation attempts, in seconds.
pub const DEFAULT_RECONNECT_SECS: u64 = 10;

/// Poll-loop granularity, in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 100;

// ============================================================================
// Configuration Limits
// ============================================================================

/// Longest accepted lockout penalty, in seconds (one day).
pub const MAX_LOCKOUT_SECS: u64 = 86_400;

/// Longest accepted unlock window, in milliseconds (five minutes).
pub const MAX_UNLOCK_MS: u64 = 300_000;

/// Longest accepted heartbeat interval, in seconds (one day).
pub const MAX_HEARTBEAT_SECS: u64 = 86_400;

/// Longest accepted reassociation spacing, in seconds (one hour).
pub const MAX_RECONNECT_SECS: u64 = 3_600;

/// Longest accepted poll-loop granularity, in milliseconds.
pub const MAX_TICK_MS: u64 = 10_000;

// ============================================================================
// Device Identity
// ============================================================================

/// Size of the persisted identity slot in bytes.
///
/// One byte of the slot is reserved for the terminator, so the usable token
/// length is [`MAX_IDENTITY_LEN`].
pub const IDENTITY_SLOT_SIZE: usize = 256;

/// Maximum token length in bytes that fits the identity slot.
pub const MAX_IDENTITY_LEN: usize = IDENTITY_SLOT_SIZE - 1;
