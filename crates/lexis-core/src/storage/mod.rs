//! Graph storage abstractions
//!
//! Core defines the [`GraphStore`] contract and an in-memory implementation.
//! Persistent backends (SurrealDB) live in their own crates and depend on
//! these traits, never the other way around.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryGraphStore, MemoryStoreCalls};
pub use traits::{check_endpoints, GraphStore};
