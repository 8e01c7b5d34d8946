use thiserror::Error;

/// Failures the access controller can report.
///
/// None of these is fatal at the process level: after any of them the
/// controller keeps accepting events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Access decisions
    #[error("Code rejected by remote authority")]
    ValidationRejected,

    #[error("Locked out for another {remaining_secs}s")]
    LockedOut { remaining_secs: u64 },

    #[error("Offline: {reason}")]
    Offline { reason: String },

    // Infrastructure
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Transient network error: {0}")]
    TransientNetwork(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new offline error.
    pub fn offline(reason: impl Into<String>) -> Self {
        Self::Offline {
            reason: reason.into(),
        }
    }

    /// Create a new persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Create a new transient network error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientNetwork(message.into())
    }

    /// Create a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
