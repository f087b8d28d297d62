//! # Lexis SurrealDB
//!
//! Persistent [`GraphStore`](lexis_core::GraphStore) backed by SurrealDB,
//! either in memory or on RocksDB.
//!
//! ```no_run
//! use lexis_surrealdb::{SurrealClient, SurrealGraphStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SurrealClient::new_file("./lexis.db").await?;
//! let store = SurrealGraphStore::open(client).await?;
//! # Ok(())
//! # }
//! ```

pub mod graph_store;
pub mod schema;
pub mod surreal_client;
pub mod types;

pub use graph_store::SurrealGraphStore;
pub use schema::apply_graph_schema;
pub use surreal_client::SurrealClient;
pub use types::{DbError, DbResult, SurrealDbConfig};
