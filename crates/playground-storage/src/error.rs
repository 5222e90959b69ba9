//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reading or writing a stored document.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("store unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// The document exists but does not decode as the requested type.
    #[error("stored document is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unusable storage key: {0}")]
    InvalidKey(String),

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("in-memory store unusable after a panic: {0}")]
    LockPoisoned(String),
}

impl StorageError {
    /// Create an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey(message.into())
    }

    /// Whether the stored bytes were present but unreadable as the
    /// requested type.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_invalid_key_formats_message() {
        let err = StorageError::invalid_key("empty key component");
        assert_eq!(err.to_string(), "unusable storage key: empty key component");
    }

    #[test]
    fn storage_error_io_wraps_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::from(io_err);
        assert!(err.to_string().starts_with("store unavailable"));
        assert!(!err.is_malformed());
    }

    #[test]
    fn storage_error_json_is_malformed() {
        let json_err = serde_json::from_str::<String>("{not json").unwrap_err();
        let err = StorageError::from(json_err);
        assert!(err.to_string().contains("malformed"));
        assert!(err.is_malformed());
    }

    #[test]
    fn storage_error_lock_poisoned_displays() {
        let err = StorageError::LockPoisoned("rwlock poisoned".to_string());
        assert!(err.to_string().ends_with("rwlock poisoned"));
    }
}
