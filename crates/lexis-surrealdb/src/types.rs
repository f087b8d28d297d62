//! Connection configuration and database error types

use lexis_config::StoreConfig;
use lexis_core::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the SurrealDB backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurrealDbConfig {
    pub namespace: String,
    pub database: String,
    /// `:memory:` (or empty) for the in-memory engine, otherwise a RocksDB directory
    pub path: String,
}

impl Default for SurrealDbConfig {
    fn default() -> Self {
        Self {
            namespace: "lexis".to_string(),
            database: "lexicon".to_string(),
            path: "./lexis.db".to_string(),
        }
    }
}

impl From<&StoreConfig> for SurrealDbConfig {
    fn from(store: &StoreConfig) -> Self {
        Self {
            namespace: store.namespace.clone(),
            database: store.database.clone(),
            path: store.path.clone(),
        }
    }
}

impl SurrealDbConfig {
    pub fn is_memory(&self) -> bool {
        self.path.is_empty() || self.path == ":memory:"
    }
}

#[derive(Error, Debug, Clone)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for StorageError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connection(msg) => StorageError::Unavailable(msg),
            DbError::Query(msg) | DbError::Schema(msg) => StorageError::Backend(msg),
            DbError::Decode(msg) => StorageError::Serialization(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_fatal() {
        let err: StorageError = DbError::Connection("socket closed".into()).into();
        assert!(err.is_fatal());
        let err: StorageError = DbError::Query("parse error".into()).into();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_config_from_store_section() {
        let store = StoreConfig {
            path: ":memory:".into(),
            ..StoreConfig::default()
        };
        let config = SurrealDbConfig::from(&store);
        assert!(config.is_memory());
        assert_eq!(config.namespace, "lexis");
    }
}
