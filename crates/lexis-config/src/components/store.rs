//! Graph store configuration

use serde::{Deserialize, Serialize};

/// Which graph store backend to open
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local maps, lost on exit
    Memory,
    /// SurrealDB, in-memory or RocksDB-backed depending on `path`
    #[default]
    SurrealDb,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// `:memory:` or a RocksDB directory
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_path() -> String {
    "./lexis.db".to_string()
}

fn default_namespace() -> String {
    "lexis".to_string()
}

fn default_database() -> String {
    "lexicon".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_path(),
            namespace: default_namespace(),
            database: default_database(),
        }
    }
}

impl StoreConfig {
    pub fn is_in_memory(&self) -> bool {
        self.backend == StoreBackend::Memory || self.path.is_empty() || self.path == ":memory:"
    }
}
