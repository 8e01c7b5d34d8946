//! Controller configuration.
//!
//! Durations are stored as integer seconds or milliseconds so the struct
//! round-trips cleanly through JSON configuration files; use the accessor
//! methods to obtain [`Duration`] values.

use crate::constants::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable policy and timing for the access controller.
///
/// # Examples
///
/// ```
/// use lockin_core::ControllerConfig;
///
/// let config = ControllerConfig::default()
///     .with_max_attempts(3)
///     .with_lockout_secs(900);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.lockout_duration().as_secs(), 900);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Exact length of an access code
    pub code_length: usize,

    /// Consecutive failures that trigger a lockout
    pub max_attempts: u32,

    /// Lockout penalty in seconds
    pub lockout_secs: u64,

    /// Time the bolt stays released, in milliseconds
    pub unlock_ms: u64,

    /// Heartbeat interval in seconds
    pub heartbeat_secs: u64,

    /// Bound on every remote call, in milliseconds
    pub network_timeout_ms: u64,

    /// Minimum spacing between reassociation attempts, in seconds
    pub reconnect_secs: u64,

    /// Poll-loop granularity in milliseconds
    pub tick_ms: u64,

    /// Firmware version reported in heartbeats
    pub firmware_version: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lockout_secs: DEFAULT_LOCKOUT_SECS,
            unlock_ms: DEFAULT_UNLOCK_MS,
            heartbeat_secs: DEFAULT_HEARTBEAT_SECS,
            network_timeout_ms: DEFAULT_NETWORK_TIMEOUT_MS,
            reconnect_secs: DEFAULT_RECONNECT_SECS,
            tick_ms: DEFAULT_TICK_MS,
            firmware_version: crate::VERSION.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Parse a configuration from JSON; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is malformed or the resulting
    /// configuration fails [`validate`](Self::validate).
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the controller cannot honour.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if:
    /// - `code_length`, `max_attempts` or any duration is zero
    /// - a duration exceeds its limit in [`constants`](crate::constants)
    /// - the network timeout is not strictly shorter than the unlock duration
    pub fn validate(&self) -> Result<()> {
        if self.code_length == 0 {
            return Err(Error::config("code_length must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(Error::config("max_attempts must be at least 1"));
        }
        let durations = [
            ("lockout_secs", self.lockout_secs, MAX_LOCKOUT_SECS),
            ("unlock_ms", self.unlock_ms, MAX_UNLOCK_MS),
            ("heartbeat_secs", self.heartbeat_secs, MAX_HEARTBEAT_SECS),
            ("network_timeout_ms", self.network_timeout_ms, MAX_UNLOCK_MS),
            ("reconnect_secs", self.reconnect_secs, MAX_RECONNECT_SECS),
            ("tick_ms", self.tick_ms, MAX_TICK_MS),
        ];
        for (name, value, max) in durations {
            if value == 0 {
                return Err(Error::config(format!("{name} must be greater than zero")));
            }
            if value > max {
                return Err(Error::config(format!("{name} ({value}) exceeds {max}")));
            }
        }
        // A remote call must never outlive the unlock window.
        if self.network_timeout_ms >= self.unlock_ms {
            return Err(Error::config(format!(
                "network_timeout_ms ({}) must be shorter than unlock_ms ({})",
                self.network_timeout_ms, self.unlock_ms
            )));
        }
        Ok(())
    }

    pub fn lockout_duration(&self) -> Duration {
        Duration::from_secs(self.lockout_secs)
    }

    pub fn unlock_duration(&self) -> Duration {
        Duration::from_millis(self.unlock_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_millis(self.network_timeout_ms)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Set the code length
    pub fn with_code_length(mut self, length: usize) -> Self {
        self.code_length = length;
        self
    }

    /// Set the number of failures that trigger a lockout
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the lockout penalty
    pub fn with_lockout_secs(mut self, secs: u64) -> Self {
        self.lockout_secs = secs;
        self
    }

    /// Set the unlock window
    pub fn with_unlock_ms(mut self, ms: u64) -> Self {
        self.unlock_ms = ms;
        self
    }

    /// Set the heartbeat interval
    pub fn with_heartbeat_secs(mut self, secs: u64) -> Self {
        self.heartbeat_secs = secs;
        self
    }

    /// Set the remote call bound
    pub fn with_network_timeout_ms(mut self, ms: u64) -> Self {
        self.network_timeout_ms = ms;
        self
    }

    /// Set the reassociation spacing
    pub fn with_reconnect_secs(mut self, secs: u64) -> Self {
        self.reconnect_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_config_defaults() {
        let config = ControllerConfig::default();

        assert_eq!(config.code_length, 6);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.lockout_duration(), Duration::from_secs(900));
        assert_eq!(config.unlock_duration(), Duration::from_secs(5));
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(60));
        assert_eq!(config.network_timeout(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_fluent_api() {
        let config = ControllerConfig::default()
            .with_code_length(4)
            .with_max_attempts(3)
            .with_lockout_secs(60)
            .with_unlock_ms(2_000)
            .with_network_timeout_ms(500);

        assert_eq!(config.code_length, 4);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.lockout_secs, 60);
        assert_eq!(config.unlock_ms, 2_000);
        assert_eq!(config.network_timeout_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(ControllerConfig::default().with_code_length(0))]
    #[case(ControllerConfig::default().with_max_attempts(0))]
    #[case(ControllerConfig::default().with_lockout_secs(0))]
    #[case(ControllerConfig::default().with_heartbeat_secs(0))]
    #[case(ControllerConfig::default().with_reconnect_secs(0))]
    #[case(ControllerConfig::default().with_lockout_secs(MAX_LOCKOUT_SECS + 1))]
    #[case(ControllerConfig::default().with_lockout_secs(u64::MAX))]
    #[case(ControllerConfig::default().with_unlock_ms(MAX_UNLOCK_MS + 1))]
    #[case(ControllerConfig::default().with_heartbeat_secs(MAX_HEARTBEAT_SECS + 1))]
    #[case(ControllerConfig::default().with_reconnect_secs(MAX_RECONNECT_SECS + 1))]
    #[case(ControllerConfig::default().with_unlock_ms(3_000).with_network_timeout_ms(3_000))]
    #[case(ControllerConfig::default().with_unlock_ms(1_000).with_network_timeout_ms(2_000))]
    fn test_config_rejects_invalid(#[case] config: ControllerConfig) {
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_accepts_limits() {
        let config = ControllerConfig::default()
            .with_lockout_secs(MAX_LOCKOUT_SECS)
            .with_unlock_ms(MAX_UNLOCK_MS)
            .with_heartbeat_secs(MAX_HEARTBEAT_SECS)
            .with_reconnect_secs(MAX_RECONNECT_SECS);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json_rejects_huge_penalty() {
        let result = ControllerConfig::from_json(
            r#"{"max_attempts": 1, "lockout_secs": 18446744073709551615}"#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = ControllerConfig::from_json(r#"{"max_attempts": 3, "lockout_secs": 120}"#)
            .unwrap();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.lockout_secs, 120);
        assert_eq!(config.code_length, DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn test_config_from_json_validates() {
        let result = ControllerConfig::from_json(r#"{"network_timeout_ms": 9000}"#);
        assert!(matches!(result, Err(Error::Config(_))));

        let result = ControllerConfig::from_json("not json");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
