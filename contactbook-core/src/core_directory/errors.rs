/*
    errors.rs - Error types for the directory subsystem

    Covers everything that can go wrong between the contact layer and the
    Directory Store:
    - Authorization (writer does not own the record)
    - Version conflicts on optimistic writes
    - Undecodable record content
    - Collaborator I/O failures
*/

use super::types::{RecordKey, Version};
use thiserror::Error;

/// Errors that can occur in the directory subsystem
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Writer or reader is not allowed to act on the record
    #[error("Permission denied on {0}")]
    Forbidden(RecordKey),

    /// Record changed between fetch and store
    #[error("Concurrent modification of {key}: expected version {expected:?}, found {actual:?}")]
    Conflict {
        key: RecordKey,
        expected: Option<Version>,
        actual: Option<Version>,
    },

    /// Stored content could not be decoded
    #[error("Corrupted record {key}: {reason}")]
    Corrupted { key: RecordKey, reason: String },

    /// Container could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store could not be reached or rejected the request
    #[error("Directory store unavailable: {0}")]
    Unavailable(String),
}

impl DirectoryError {
    /// Whether the failure is a lost optimistic race that a refetch may fix
    pub fn is_conflict(&self) -> bool {
        matches!(self, DirectoryError::Conflict { .. })
    }
}

/// Result type for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl From<bincode::Error> for DirectoryError {
    fn from(err: bincode::Error) -> Self {
        DirectoryError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_display() {
        let err = DirectoryError::Forbidden(RecordKey::new("contacts_a1"));
        assert_eq!(err.to_string(), "Permission denied on contacts_a1");
    }

    #[test]
    fn test_conflict_error() {
        let err = DirectoryError::Conflict {
            key: RecordKey::address_book(),
            expected: Some(Version(2)),
            actual: Some(Version(3)),
        };
        assert!(err.is_conflict());
        assert!(err.to_string().contains("addressbook"));
        assert!(!DirectoryError::Unavailable("down".to_string()).is_conflict());
    }
}
