use thiserror::Error;

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors that can occur while talking to the remote authority or the link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The call did not complete within its bound
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Transport-level failure (connection refused, reset, DNS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The authority answered with a non-success status
    #[error("Unexpected status {0}")]
    Status(u16),

    /// The local link is not associated
    #[error("Link down: {0}")]
    Disconnected(String),
}

impl NetworkError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::Disconnected(message.into())
    }
}

impl From<NetworkError> for lockin_core::Error {
    fn from(error: NetworkError) -> Self {
        lockin_core::Error::transient(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        assert_eq!(
            NetworkError::Timeout(3000).to_string(),
            "Request timeout after 3000ms"
        );
    }

    #[test]
    fn test_converts_to_transient() {
        let error: lockin_core::Error = NetworkError::Status(503).into();
        assert!(matches!(error, lockin_core::Error::TransientNetwork(_)));
    }
}
