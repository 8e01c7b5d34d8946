//! Brute-force lockout policy.
//!
//! The policy is evaluated before any network call: while a lockout window is
//! open, submissions are refused without consulting the remote authority.
//!
//! - Every rejected code increments the attempt counter.
//! - When the counter reaches `max_attempts`, the window opens for `penalty`.
//! - Any accepted code resets the counter and closes the window.
//! - The window is closed at exactly `lockout_until` (strict `<`).
//!
//! The counter is not reset when a window opens, so after the window expires
//! a single further failure reopens it. Only a success clears the slate.

use lockin_core::ControllerConfig;
use std::time::Duration;
use tokio::time::Instant;

/// Policy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub penalty: Duration,
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, penalty: Duration) -> Self {
        Self {
            max_attempts,
            penalty,
        }
    }
}

impl From<&ControllerConfig> for LockoutPolicy {
    fn from(config: &ControllerConfig) -> Self {
        Self::new(config.max_attempts, config.lockout_duration())
    }
}

/// Result of recording a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureVerdict {
    /// Counted; still below the threshold.
    Counted { attempts: u32 },
    /// Threshold reached; the window is open until `until`.
    LockoutTriggered { attempts: u32, until: Instant },
}

impl FailureVerdict {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Counted { attempts } | Self::LockoutTriggered { attempts, .. } => *attempts,
        }
    }
}

/// Attempt counter and lockout window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockoutState {
    attempt_count: u32,
    lockout_until: Option<Instant>,
}

impl LockoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// End of the most recent lockout window, even if it already passed.
    pub fn lockout_until(&self) -> Option<Instant> {
        self.lockout_until
    }

    pub fn is_locked_out(&self, now: Instant) -> bool {
        self.lockout_until.is_some_and(|until| now < until)
    }

    /// Time left in the lockout window, zero when none is open.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.lockout_until
            .map(|until| until.saturating_duration_since(now))
            .unwrap_or_default()
    }

    pub fn record_failure(&mut self, policy: &LockoutPolicy, now: Instant) -> FailureVerdict {
        self.attempt_count = self.attempt_count.saturating_add(1);
        let attempts = self.attempt_count;

        if attempts >= policy.max_attempts {
            let until = deadline(now, policy.penalty);
            self.lockout_until = Some(until);
            FailureVerdict::LockoutTriggered { attempts, until }
        } else {
            FailureVerdict::Counted { attempts }
        }
    }

    pub fn record_success(&mut self) {
        self.attempt_count = 0;
        self.lockout_until = None;
    }
}

/// `now + penalty`, shortened until it fits when the sum would overflow.
fn deadline(now: Instant, penalty: Duration) -> Instant {
    let mut penalty = penalty;
    loop {
        if let Some(until) = now.checked_add(penalty) {
            return until;
        }
        penalty /= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn policy(max_attempts: u32) -> LockoutPolicy {
        LockoutPolicy::new(max_attempts, Duration::from_secs(900))
    }

    #[test]
    fn test_fresh_state_is_open() {
        let state = LockoutState::new();
        let now = Instant::now();

        assert_eq!(state.attempt_count(), 0);
        assert!(!state.is_locked_out(now));
        assert_eq!(state.remaining(now), Duration::ZERO);
    }

    #[test]
    fn test_lockout_triggers_on_max_attempt() {
        let mut state = LockoutState::new();
        let policy = policy(3);
        let now = Instant::now();

        assert_eq!(
            state.record_failure(&policy, now),
            FailureVerdict::Counted { attempts: 1 }
        );
        assert_eq!(
            state.record_failure(&policy, now),
            FailureVerdict::Counted { attempts: 2 }
        );
        assert_eq!(
            state.record_failure(&policy, now),
            FailureVerdict::LockoutTriggered {
                attempts: 3,
                until: now + Duration::from_secs(900)
            }
        );
        assert!(state.is_locked_out(now));
    }

    #[test]
    fn test_window_closes_exactly_at_deadline() {
        let mut state = LockoutState::new();
        let now = Instant::now();
        state.record_failure(&policy(1), now);

        let until = now + Duration::from_secs(900);
        assert!(state.is_locked_out(until - Duration::from_nanos(1)));
        assert!(!state.is_locked_out(until));
        assert_eq!(state.remaining(until), Duration::ZERO);
        assert_eq!(state.remaining(now), Duration::from_secs(900));
    }

    #[test]
    fn test_success_resets_everything() {
        let mut state = LockoutState::new();
        let now = Instant::now();
        state.record_failure(&policy(1), now);

        state.record_success();

        assert_eq!(state, LockoutState::new());
        assert!(!state.is_locked_out(now));
    }

    #[test]
    fn test_failure_after_expiry_reopens_window() {
        let mut state = LockoutState::new();
        let policy = policy(2);
        let now = Instant::now();
        state.record_failure(&policy, now);
        state.record_failure(&policy, now);

        let later = now + Duration::from_secs(901);
        assert!(!state.is_locked_out(later));

        let verdict = state.record_failure(&policy, later);
        assert!(matches!(verdict, FailureVerdict::LockoutTriggered { attempts: 3, .. }));
        assert!(state.is_locked_out(later));
    }

    #[test]
    fn test_oversized_penalty_does_not_overflow() {
        let mut state = LockoutState::new();
        let policy = LockoutPolicy::new(1, Duration::MAX);
        let now = Instant::now();

        let verdict = state.record_failure(&policy, now);

        assert!(matches!(verdict, FailureVerdict::LockoutTriggered { .. }));
        assert!(state.is_locked_out(now + Duration::from_secs(86_400 * 365)));
    }

    #[test]
    fn test_policy_from_config() {
        let config = ControllerConfig::default()
            .with_max_attempts(3)
            .with_lockout_secs(60);
        let policy = LockoutPolicy::from(&config);

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.penalty, Duration::from_secs(60));
    }

    proptest! {
        #[test]
        fn prop_lockout_starts_exactly_at_threshold(max in 1u32..20, penalty_secs in 1u64..3600) {
            let policy = LockoutPolicy::new(max, Duration::from_secs(penalty_secs));
            let mut state = LockoutState::new();
            let now = Instant::now();

            for attempt in 1..max {
                let verdict = state.record_failure(&policy, now);
                prop_assert_eq!(verdict, FailureVerdict::Counted { attempts: attempt });
                prop_assert!(!state.is_locked_out(now));
            }

            let verdict = state.record_failure(&policy, now);
            let triggered = matches!(verdict, FailureVerdict::LockoutTriggered { .. });
            prop_assert!(triggered);
            prop_assert_eq!(state.lockout_until(), Some(now + policy.penalty));
            prop_assert!(state.is_locked_out(now + policy.penalty - Duration::from_millis(1)));
            prop_assert!(!state.is_locked_out(now + policy.penalty));
        }

        #[test]
        fn prop_success_always_resets(failures in 0u32..50, max in 1u32..10) {
            let policy = LockoutPolicy::new(max, Duration::from_secs(60));
            let mut state = LockoutState::new();
            let now = Instant::now();

            for _ in 0..failures {
                state.record_failure(&policy, now);
            }
            state.record_success();

            prop_assert_eq!(state.attempt_count(), 0);
            prop_assert!(!state.is_locked_out(now));
        }
    }
}
