use thiserror::Error;

/// Storage-specific error types for identity persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Token does not fit the identity slot
    #[error("Identity token is {len} bytes, slot holds at most {max}")]
    IdentityTooLong { len: usize, max: usize },

    /// Backing medium refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for lockin_core::Error {
    fn from(error: StorageError) -> Self {
        lockin_core::Error::persistence(error.to_string())
    }
}
