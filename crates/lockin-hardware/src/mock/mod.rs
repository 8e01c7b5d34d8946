//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled and
//! inspected programmatically without physical hardware.

pub mod actuator;
pub mod buttons;

// Re-export commonly used types
pub use actuator::{ActuatorAction, MockActuator, MockActuatorHandle};
pub use buttons::{MockButtons, MockButtonsHandle};
