//! Storage Error Types
//!
//! Errors raised by graph store backends. "Not found" is modelled as
//! `Ok(None)` by lookups; [`StorageError::NotFound`] only appears when a
//! caller explicitly requires an entity.

use crate::types::EntityKind;
use thiserror::Error;

/// Error type for graph store operations
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: EntityKind, key: String },

    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Create a generic backend error
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    /// No further progress is possible once the store itself is gone
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_fatal() {
        assert!(StorageError::Unavailable("connection refused".to_string()).is_fatal());
        assert!(!StorageError::backend("bad query").is_fatal());
        assert!(!StorageError::not_found(EntityKind::Concept, "dog.n.01").is_fatal());
    }

    #[test]
    fn test_not_found_message() {
        let err = StorageError::not_found(EntityKind::RootWord, "dog");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "root_word 'dog' not found");
    }
}
