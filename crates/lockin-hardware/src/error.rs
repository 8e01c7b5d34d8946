//! Peripheral failures.

pub type Result<T> = std::result::Result<T, HardwareError>;

/// A bolt, indicator or button panel misbehaved.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The peripheral went away (unplugged, channel dropped).
    #[error("{peripheral} is gone")]
    PeripheralGone { peripheral: String },

    /// The bolt relay did not accept the command.
    #[error("Actuation failed: {message}")]
    ActuationFailed { message: String },
}

impl HardwareError {
    pub fn gone(peripheral: impl Into<String>) -> Self {
        Self::PeripheralGone {
            peripheral: peripheral.into(),
        }
    }

    pub fn actuation(message: impl Into<String>) -> Self {
        Self::ActuationFailed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gone_names_the_peripheral() {
        let error = HardwareError::gone("button panel");
        assert!(matches!(error, HardwareError::PeripheralGone { .. }));
        assert_eq!(error.to_string(), "button panel is gone");
    }

    #[test]
    fn test_actuation_message() {
        let error = HardwareError::actuation("coil open circuit");
        assert_eq!(error.to_string(), "Actuation failed: coil open circuit");
    }
}
