//! Peripheral capability traits.
//!
//! These traits are the contract between the access controller and the
//! physical lock. All methods use native `async fn` (Rust 1.90 + Edition 2024
//! RPITIT), so the traits are used through generic parameters rather than
//! trait objects.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use lockin_core::Signal;

/// LED and buzzer feedback.
///
/// Renders an abstract [`Signal`] on whatever feedback hardware is present;
/// see [`IndicatorPattern`](crate::IndicatorPattern) for the standard table.
pub trait Indicator: Send {
    /// Show a feedback signal on the LED and buzzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the indicator hardware is unavailable. Callers
    /// treat indicator failures as non-fatal.
    async fn indicate(&mut self, signal: Signal) -> Result<()>;
}

/// Bolt driver.
///
/// `engage` drives the bolt closed, `release` opens it. Every lock also
/// carries an [`Indicator`] for feedback at the door.
///
/// # Examples
///
/// ```no_run
/// use lockin_core::Signal;
/// use lockin_hardware::traits::{Indicator, LockActuator};
/// use lockin_hardware::Result;
///
/// async fn open_briefly<L: LockActuator>(lock: &mut L) -> Result<()> {
///     lock.release().await?;
///     lock.indicate(Signal::Unlocked).await?;
///     Ok(())
/// }
/// ```
pub trait LockActuator: Indicator {
    /// Drive the bolt into the locked position.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay cannot be driven.
    async fn engage(&mut self) -> Result<()>;

    /// Retract the bolt.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay cannot be driven.
    async fn release(&mut self) -> Result<()>;
}

/// A debounced physical button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonPress {
    /// Request pairing mode.
    Pairing,

    /// Emergency manual unlock.
    ManualUnlock,
}

/// Source of debounced button presses.
///
/// Debouncing belongs to the driver: each value returned is one deliberate
/// press.
pub trait ButtonSource: Send {
    /// Wait for the next press.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::PeripheralGone` once the source is closed.
    async fn next_press(&mut self) -> Result<ButtonPress>;
}
