//! Mock button source for testing and development.

use crate::{
    HardwareError, Result,
    traits::{ButtonPress, ButtonSource},
};
use tokio::sync::mpsc;

/// Mock button panel fed through a channel.
///
/// # Examples
///
/// ```
/// use lockin_hardware::mock::MockButtons;
/// use lockin_hardware::traits::{ButtonPress, ButtonSource};
///
/// #[tokio::main]
/// async fn main() -> lockin_hardware::Result<()> {
///     let (mut buttons, handle) = MockButtons::new();
///
///     handle.press(ButtonPress::ManualUnlock).await?;
///     assert_eq!(buttons.next_press().await?, ButtonPress::ManualUnlock);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockButtons {
    press_rx: mpsc::Receiver<ButtonPress>,
}

impl MockButtons {
    /// Create a new mock button source and its controlling handle.
    pub fn new() -> (Self, MockButtonsHandle) {
        let (press_tx, press_rx) = mpsc::channel(8);
        (Self { press_rx }, MockButtonsHandle { press_tx })
    }
}

impl Default for MockButtons {
    fn default() -> Self {
        Self::new().0
    }
}

impl ButtonSource for MockButtons {
    async fn next_press(&mut self) -> Result<ButtonPress> {
        self.press_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::gone("button panel"))
    }
}

/// Handle for simulating button presses.
#[derive(Debug, Clone)]
pub struct MockButtonsHandle {
    press_tx: mpsc::Sender<ButtonPress>,
}

impl MockButtonsHandle {
    /// Simulate a press.
    ///
    /// # Errors
    ///
    /// Returns an error if the button source has been dropped.
    pub async fn press(&self, press: ButtonPress) -> Result<()> {
        self.press_tx
            .send(press)
            .await
            .map_err(|_| HardwareError::gone("button panel"))
    }
}
