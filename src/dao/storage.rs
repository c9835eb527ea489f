use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by remote collaborators regardless of the underlying backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("remote call failed: {message}")]
    Remote {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },
}

impl StorageError {
    /// Construct a remote error from any backend failure.
    pub fn remote(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Remote {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Construct a remote error that has no underlying cause (rejected payload, etc).
    pub fn rejected(message: impl Into<String>) -> Self {
        StorageError::Remote {
            message: message.into(),
            source: None,
        }
    }
}
