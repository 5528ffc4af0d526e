//! Store error types
//!
//! Errors raised by key-value backends. The namespaced [`LocalStore`]
//! logs and swallows these; they only surface to callers that talk to a
//! backend directly.
//!
//! [`LocalStore`]: crate::store::LocalStore

use thiserror::Error;

/// Errors that can occur in a key-value backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Writing the value would exceed the configured byte quota
    #[error("Quota exceeded: writing {requested} bytes would exceed the {quota} byte limit")]
    QuotaExceeded { requested: usize, quota: usize },

    /// SQLite backend error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::QuotaExceeded {
            requested: 10,
            quota: 5,
        };
        assert_eq!(
            err.to_string(),
            "Quota exceeded: writing 10 bytes would exceed the 5 byte limit"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }
}
