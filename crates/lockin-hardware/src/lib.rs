//! Peripheral abstraction layer for the Lockin smart lock.
//!
//! The access controller never touches GPIO directly. It drives the bolt
//! through the [`LockActuator`] capability and the LED/buzzer through its
//! [`Indicator`] supertrait, and physical buttons reach it through a
//! [`ButtonSource`]. All three are async traits using
//! native `async fn` (Edition 2024 RPITIT), so mock and real drivers can be
//! swapped without changing the controller.
//!
//! # Indicator Patterns
//!
//! The controller emits abstract [`Signal`]s. Drivers translate each one into
//! an [`IndicatorPattern`] (LED colour plus a tone sequence):
//!
//! ```
//! use lockin_core::Signal;
//! use lockin_hardware::types::{IndicatorPattern, LedColor};
//!
//! let pattern = IndicatorPattern::for_signal(Signal::Lockout);
//! assert_eq!(pattern.color, LedColor::Red);
//! assert_eq!(pattern.tones.len(), 5);
//! ```
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides a recording actuator and a channel-driven
//! button source for tests and the bench simulator.
//!
//! [`LockActuator`]: traits::LockActuator
//! [`Indicator`]: traits::Indicator
//! [`ButtonSource`]: traits::ButtonSource
//! [`Signal`]: lockin_core::Signal
//! [`IndicatorPattern`]: types::IndicatorPattern

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{ButtonPress, ButtonSource, Indicator, LockActuator};
pub use types::{IndicatorPattern, LedColor, Tone};
