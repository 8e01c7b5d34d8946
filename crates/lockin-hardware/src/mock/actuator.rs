//! Mock lock actuator for testing and development.
//!
//! Records every command it receives so tests can assert on the exact
//! sequence of bolt movements and indicator signals.

use crate::traits::{Indicator, LockActuator};
use crate::{HardwareError, IndicatorPattern, Result};
use lockin_core::Signal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

/// A command received by the mock actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorAction {
    Engage,
    Release,
    Indicate(Signal),
}

#[derive(Debug, Default)]
struct ActuatorState {
    actions: Vec<ActuatorAction>,
    engaged: bool,
    failing: bool,
}

/// Mock bolt and indicator.
///
/// # Examples
///
/// ```
/// use lockin_core::Signal;
/// use lockin_hardware::mock::{ActuatorAction, MockActuator};
/// use lockin_hardware::traits::{Indicator, LockActuator};
///
/// #[tokio::main]
/// async fn main() -> lockin_hardware::Result<()> {
///     let (mut actuator, handle) = MockActuator::new();
///
///     actuator.release().await?;
///     actuator.indicate(Signal::Unlocked).await?;
///
///     assert!(!handle.is_engaged());
///     assert_eq!(handle.signals(), vec![Signal::Unlocked]);
///     assert_eq!(handle.actions()[0], ActuatorAction::Release);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockActuator {
    state: Arc<Mutex<ActuatorState>>,
}

impl MockActuator {
    /// Create a new mock actuator and a handle for inspecting it.
    pub fn new() -> (Self, MockActuatorHandle) {
        let state = Arc::new(Mutex::new(ActuatorState::default()));
        let actuator = Self {
            state: Arc::clone(&state),
        };
        (actuator, MockActuatorHandle { state })
    }

    fn state(&self) -> MutexGuard<'_, ActuatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn drive(&mut self, action: ActuatorAction, engaged: bool) -> Result<()> {
        let mut state = self.state();
        state.actions.push(action);
        if state.failing {
            return Err(HardwareError::actuation("relay not responding"));
        }
        state.engaged = engaged;
        Ok(())
    }
}

impl Default for MockActuator {
    fn default() -> Self {
        Self::new().0
    }
}

impl LockActuator for MockActuator {
    async fn engage(&mut self) -> Result<()> {
        info!("Bolt engaged");
        self.drive(ActuatorAction::Engage, true)
    }

    async fn release(&mut self) -> Result<()> {
        info!("Bolt released");
        self.drive(ActuatorAction::Release, false)
    }
}

impl Indicator for MockActuator {
    async fn indicate(&mut self, signal: Signal) -> Result<()> {
        let pattern = IndicatorPattern::for_signal(signal);
        info!(
            %signal,
            color = ?pattern.color,
            beeps = pattern.tones.len(),
            "Indicator"
        );
        self.state().actions.push(ActuatorAction::Indicate(signal));
        Ok(())
    }
}

/// Handle for inspecting and controlling a mock actuator.
#[derive(Debug, Clone)]
pub struct MockActuatorHandle {
    state: Arc<Mutex<ActuatorState>>,
}

impl MockActuatorHandle {
    fn state(&self) -> MutexGuard<'_, ActuatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All commands received so far, oldest first.
    pub fn actions(&self) -> Vec<ActuatorAction> {
        self.state().actions.clone()
    }

    /// Only the indicator signals, oldest first.
    pub fn signals(&self) -> Vec<Signal> {
        self.state()
            .actions
            .iter()
            .filter_map(|action| match action {
                ActuatorAction::Indicate(signal) => Some(*signal),
                _ => None,
            })
            .collect()
    }

    pub fn last_signal(&self) -> Option<Signal> {
        self.signals().last().copied()
    }

    /// Number of times the bolt was released.
    pub fn release_count(&self) -> usize {
        self.state()
            .actions
            .iter()
            .filter(|action| **action == ActuatorAction::Release)
            .count()
    }

    /// Whether the bolt is currently in the locked position.
    pub fn is_engaged(&self) -> bool {
        self.state().engaged
    }

    /// Make subsequent bolt commands fail.
    pub fn set_failing(&self, failing: bool) {
        self.state().failing = failing;
    }

    /// Forget recorded actions.
    pub fn clear(&self) {
        self.state().actions.clear();
    }
}
