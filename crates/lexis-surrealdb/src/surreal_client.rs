//! SurrealDB client wrapper
//!
//! Thin layer over `surrealdb::Surreal<Db>` that binds JSON parameters,
//! surfaces statement errors and decodes result sets into typed rows.
//!
//! ## Supported Backends
//!
//! - **Memory (Mem)**: in-memory storage for tests and throwaway runs
//! - **File (RocksDB)**: persistent storage for full ingests

use crate::types::{DbError, DbResult, SurrealDbConfig};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

/// SurrealDB connection handle
///
/// Uses an `Arc` internally so cloning never opens a second connection.
/// RocksDB refuses a second lock on the same directory from one process.
#[derive(Clone)]
pub struct SurrealClient {
    inner: Arc<SurrealClientInner>,
}

struct SurrealClientInner {
    db: Surreal<Db>,
    config: SurrealDbConfig,
    schema_applied: AtomicBool,
}

impl std::fmt::Debug for SurrealClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrealClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

impl SurrealClient {
    /// Open an in-memory or RocksDB database depending on `config.path`
    pub async fn new(config: SurrealDbConfig) -> DbResult<Self> {
        use surrealdb::engine::local::{Mem, RocksDb};

        let db = if config.is_memory() {
            Surreal::new::<Mem>(()).await.map_err(|e| {
                DbError::Connection(format!("Failed to create in-memory database: {}", e))
            })?
        } else {
            Surreal::new::<RocksDb>(&config.path).await.map_err(|e| {
                DbError::Connection(format!(
                    "Failed to open database at {}: {}",
                    config.path, e
                ))
            })?
        };

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                DbError::Connection(format!(
                    "Failed to use namespace '{}' and database '{}': {}",
                    config.namespace, config.database, e
                ))
            })?;

        Ok(Self {
            inner: Arc::new(SurrealClientInner {
                db,
                config,
                schema_applied: AtomicBool::new(false),
            }),
        })
    }

    pub async fn new_memory() -> DbResult<Self> {
        Self::new(SurrealDbConfig {
            path: ":memory:".to_string(),
            ..SurrealDbConfig::default()
        })
        .await
    }

    /// Open a persistent RocksDB database at `path`
    pub async fn new_file(path: &str) -> DbResult<Self> {
        Self::new(SurrealDbConfig {
            path: path.to_string(),
            ..SurrealDbConfig::default()
        })
        .await
    }

    /// In-memory client with a namespace and database unique to this call
    ///
    /// Keeps tests isolated when they run in parallel.
    #[cfg(any(test, feature = "test-utils"))]
    pub async fn new_isolated_memory() -> DbResult<Self> {
        use std::time::SystemTime;

        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let thread_id = std::thread::current().id();

        Self::new(SurrealDbConfig {
            namespace: format!("test_{:?}", thread_id).replace(['(', ')'], ""),
            database: format!("db_{}", timestamp),
            path: ":memory:".to_string(),
        })
        .await
    }

    pub fn config(&self) -> &SurrealDbConfig {
        &self.inner.config
    }

    pub(crate) fn schema_applied(&self) -> bool {
        self.inner.schema_applied.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_schema_applied(&self) {
        self.inner.schema_applied.store(true, Ordering::Relaxed);
    }

    /// Run `sql` with `params` bound and fail on the first statement error
    ///
    /// Parameters are passed as objects: `{"key": value, "key2": value2}`.
    async fn run(&self, sql: &str, params: &[Value]) -> DbResult<surrealdb::Response> {
        let mut query = self.inner.db.query(sql);
        for param in params {
            if let Value::Object(map) = param {
                for (key, value) in map {
                    query = query.bind((key.clone(), value.clone()));
                }
            }
        }

        let response = query
            .await
            .map_err(|e| DbError::Query(format!("Query execution failed: {}", e)))?;
        response
            .check()
            .map_err(|e| DbError::Query(format!("Query returned error: {}", e)))
    }

    /// Execute statements whose results are not needed
    pub async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<()> {
        self.run(sql, params).await.map(|_| ())
    }

    /// Execute a single-statement query and decode its rows
    pub async fn query<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> DbResult<Vec<T>> {
        self.query_at(sql, params, 0).await
    }

    /// Execute a multi-statement query and decode the rows of statement `index`
    pub async fn query_at<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
        index: usize,
    ) -> DbResult<Vec<T>> {
        let mut response = self.run(sql, params).await?;
        response
            .take::<Vec<T>>(index)
            .map_err(|e| DbError::Decode(format!("Failed to decode query results: {}", e)))
    }
}
