use rollcall_core::Identifier;
use thiserror::Error;

/// Storage-specific error types for the attendance terminal.
///
/// These errors represent failures loading the directory table and
/// appending to the attendance ledger.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory file is not valid JSON for the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A directory entry failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The same identifier appears twice in the directory
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(Identifier),

    /// The ledger cannot accept records right now
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let id = Identifier::new(12).unwrap();
        assert_eq!(
            StorageError::DuplicateIdentifier(id).to_string(),
            "Duplicate identifier: 12"
        );
        assert_eq!(
            StorageError::Validation("empty name".to_string()).to_string(),
            "Validation error: empty name"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
