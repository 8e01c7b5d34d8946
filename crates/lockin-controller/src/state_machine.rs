//! Bolt state machine.
//!
//! # States
//!
//! - `Locked`: initial state; the bolt is engaged
//! - `Unlocked`: the bolt is retracted until the relock deadline
//!
//! # Transitions
//!
//! - Locked → Unlocked on a validated code or a manual override
//! - Unlocked → Unlocked when released again (the deadline is re-armed)
//! - Unlocked → Locked once the unlock window has elapsed
//!
//! There is no stable unlocked state: every release carries a deadline and
//! [`LockMachine::relock`] fires once it is reached. The machine never
//! blocks; the caller checks the deadline on every loop iteration.
//!
//! # Examples
//!
//! ```
//! use lockin_controller::{LockMachine, TransitionCause};
//! use lockin_core::LockState;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let mut machine = LockMachine::new(Duration::from_secs(5));
//! let t0 = Instant::now();
//!
//! machine.release(t0, TransitionCause::Validated);
//! assert_eq!(machine.state(), LockState::Unlocked);
//!
//! assert!(machine.relock(t0 + Duration::from_secs(4)).is_none());
//! assert!(machine.relock(t0 + Duration::from_secs(5)).is_some());
//! assert_eq!(machine.state(), LockState::Locked);
//! ```

use lockin_core::LockState;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Maximum number of transitions kept for diagnostics.
const MAX_HISTORY_SIZE: usize = 32;

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// Initial lock at power-up.
    Boot,
    /// The remote authority accepted a code.
    Validated,
    /// Physical override button.
    ManualOverride,
    /// The unlock window elapsed.
    AutoRelock,
}

impl fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = match self {
            Self::Boot => "boot",
            Self::Validated => "validated",
            Self::ManualOverride => "manual_override",
            Self::AutoRelock => "auto_relock",
        };
        f.write_str(cause)
    }
}

/// A single recorded transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTransition {
    pub from: LockState,
    pub to: LockState,
    pub cause: TransitionCause,
    pub at: Instant,
}

/// Locked/Unlocked state with a time-triggered relock.
///
/// Not thread-safe; owned by the controller and mutated from a single
/// control loop.
#[derive(Debug)]
pub struct LockMachine {
    state: LockState,
    unlocked_at: Option<Instant>,
    unlock_duration: Duration,
    history: VecDeque<LockTransition>,
}

impl LockMachine {
    /// Create a machine in the `Locked` state.
    pub fn new(unlock_duration: Duration) -> Self {
        Self {
            state: LockState::Locked,
            unlocked_at: None,
            unlock_duration,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    /// When the current unlock window ends, `None` while locked.
    pub fn relock_deadline(&self) -> Option<Instant> {
        self.unlocked_at.map(|at| at + self.unlock_duration)
    }

    /// Whether the unlock window has elapsed at `now`.
    pub fn relock_due(&self, now: Instant) -> bool {
        self.relock_deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Retract the bolt and arm the relock deadline at `now + unlock_duration`.
    ///
    /// Releasing an already unlocked machine re-arms the deadline.
    pub fn release(&mut self, now: Instant, cause: TransitionCause) -> LockTransition {
        self.unlocked_at = Some(now);
        self.record(LockState::Unlocked, cause, now)
    }

    /// Relock if the deadline has passed.
    ///
    /// Returns the transition when one happened, `None` otherwise, so calling
    /// this at arbitrary granularity is harmless.
    pub fn relock(&mut self, now: Instant) -> Option<LockTransition> {
        if !self.relock_due(now) {
            return None;
        }
        self.unlocked_at = None;
        Some(self.record(LockState::Locked, TransitionCause::AutoRelock, now))
    }

    /// Lock unconditionally (used at power-up).
    pub fn force_lock(&mut self, now: Instant, cause: TransitionCause) -> LockTransition {
        self.unlocked_at = None;
        self.record(LockState::Locked, cause, now)
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<LockTransition> {
        &self.history
    }

    fn record(&mut self, to: LockState, cause: TransitionCause, at: Instant) -> LockTransition {
        let transition = LockTransition {
            from: self.state,
            to,
            cause,
            at,
        };
        self.state = to;

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(5);

    #[test]
    fn test_new_machine_starts_locked() {
        let machine = LockMachine::new(WINDOW);
        assert_eq!(machine.state(), LockState::Locked);
        assert_eq!(machine.relock_deadline(), None);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_release_arms_deadline() {
        let mut machine = LockMachine::new(WINDOW);
        let t0 = Instant::now();

        let transition = machine.release(t0, TransitionCause::Validated);

        assert_eq!(transition.from, LockState::Locked);
        assert_eq!(transition.to, LockState::Unlocked);
        assert_eq!(machine.relock_deadline(), Some(t0 + WINDOW));
    }

    #[test]
    fn test_unlocked_for_whole_window() {
        let mut machine = LockMachine::new(WINDOW);
        let t0 = Instant::now();
        machine.release(t0, TransitionCause::ManualOverride);

        for ms in [0, 1, 2_500, 4_999] {
            assert!(!machine.relock_due(t0 + Duration::from_millis(ms)));
        }
        assert!(machine.relock(t0 + Duration::from_millis(4_999)).is_none());
        assert_eq!(machine.state(), LockState::Unlocked);
    }

    #[test]
    fn test_relock_exactly_at_deadline() {
        let mut machine = LockMachine::new(WINDOW);
        let t0 = Instant::now();
        machine.release(t0, TransitionCause::Validated);

        let transition = machine.relock(t0 + WINDOW).unwrap();

        assert_eq!(transition.cause, TransitionCause::AutoRelock);
        assert_eq!(machine.state(), LockState::Locked);
        assert_eq!(machine.relock_deadline(), None);
    }

    #[test]
    fn test_relock_is_idempotent() {
        let mut machine = LockMachine::new(WINDOW);
        let t0 = Instant::now();
        machine.release(t0, TransitionCause::Validated);

        assert!(machine.relock(t0 + WINDOW).is_some());
        assert!(machine.relock(t0 + WINDOW).is_none());
        assert!(machine.relock(t0 + WINDOW * 10).is_none());
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn test_second_release_rearms_deadline() {
        let mut machine = LockMachine::new(WINDOW);
        let t0 = Instant::now();
        machine.release(t0, TransitionCause::Validated);

        let t1 = t0 + Duration::from_secs(3);
        let transition = machine.release(t1, TransitionCause::ManualOverride);

        assert_eq!(transition.from, LockState::Unlocked);
        assert!(!machine.relock_due(t0 + WINDOW));
        assert!(machine.relock_due(t1 + WINDOW));
    }

    #[test]
    fn test_locked_machine_never_relocks() {
        let mut machine = LockMachine::new(WINDOW);
        assert!(machine.relock(Instant::now() + WINDOW * 100).is_none());
    }

    #[test]
    fn test_force_lock_clears_window() {
        let mut machine = LockMachine::new(WINDOW);
        let t0 = Instant::now();
        machine.release(t0, TransitionCause::Validated);

        let transition = machine.force_lock(t0, TransitionCause::Boot);

        assert_eq!(transition.to, LockState::Locked);
        assert_eq!(machine.relock_deadline(), None);
    }

    #[test]
    fn test_history_size_limit() {
        let mut machine = LockMachine::new(WINDOW);
        let t0 = Instant::now();

        for i in 0..(MAX_HISTORY_SIZE as u64) {
            let at = t0 + WINDOW * (i as u32) * 2;
            machine.release(at, TransitionCause::Validated);
            machine.relock(at + WINDOW);
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        assert_eq!(
            machine.history().back().map(|t| t.cause),
            Some(TransitionCause::AutoRelock)
        );
    }

    #[test]
    fn test_cause_display() {
        assert_eq!(TransitionCause::AutoRelock.to_string(), "auto_relock");
        assert_eq!(TransitionCause::ManualOverride.to_string(), "manual_override");
    }
}
