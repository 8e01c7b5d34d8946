//! Input events and their results.

use crate::status::StatusSnapshot;
use lockin_core::{Error, Outcome};
use lockin_hardware::ButtonPress;

/// An input delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockEvent {
    /// A code of the configured length.
    SubmitCode(String),
    /// Manual override button.
    ManualUnlock,
    /// Provision a new identity token.
    Pair(String),
    /// Pairing button.
    BeginPairing,
    /// Request a status snapshot.
    Status,
}

impl From<ButtonPress> for LockEvent {
    fn from(press: ButtonPress) -> Self {
        match press {
            ButtonPress::ManualUnlock => Self::ManualUnlock,
            ButtonPress::Pairing => Self::BeginPairing,
        }
    }
}

/// What handling a [`LockEvent`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EventReport {
    Submission(Outcome),
    ManualUnlocked,
    Paired,
    PairingFailed(Error),
    PairingMode,
    Status(StatusSnapshot),
}
