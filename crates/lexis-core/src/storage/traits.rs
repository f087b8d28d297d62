//! Graph store contract
//!
//! A key-indexed node/edge store. Entities are identified by `(kind, name)`
//! alone and edges by `(kind, from, to)`, so every write is idempotent by key.

use super::{StorageError, StorageResult};
use crate::types::{
    Edge, Entity, EntityAttrs, EntityKind, GraphStats, NodeTag, ProcessingStatus, RelationKind,
    TagQuery, UnresolvedRef,
};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Persistent labeled graph used by every pipeline phase
///
/// Implementations must guarantee:
/// - `upsert` / `bulk_upsert` never create a second entity for the same key
/// - `connect` never creates a second edge for the same `(kind, from, to)`;
///   re-asserting an edge with a weight updates the weight
/// - tags are only ever added
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create the entity if absent, otherwise merge `attrs` into it
    async fn upsert(&self, kind: EntityKind, attrs: EntityAttrs) -> StorageResult<Entity>;

    /// Look up an entity. Absence is `Ok(None)`, not an error.
    async fn get(&self, kind: EntityKind, name: &str) -> StorageResult<Option<Entity>>;

    /// Upsert many entities of one kind in a single backend round trip.
    ///
    /// Returns the number of rows written.
    async fn bulk_upsert(&self, kind: EntityKind, rows: Vec<EntityAttrs>) -> StorageResult<usize>;

    /// All entities of a kind, ordered by name
    async fn entities(&self, kind: EntityKind) -> StorageResult<Vec<Entity>>;

    /// Entities of a kind carrying `tag`, ordered by name
    async fn tagged(&self, kind: EntityKind, tag: NodeTag) -> StorageResult<Vec<Entity>>;

    /// Connect two entities. Idempotent by `(kind, from, to)`.
    ///
    /// A `None` weight leaves an existing weight untouched.
    async fn connect(
        &self,
        kind: &RelationKind,
        from: &Entity,
        to: &Entity,
        weight: Option<f64>,
    ) -> StorageResult<Edge>;

    /// Outgoing edges of one kind, ordered by target name
    async fn edges_from(&self, kind: &RelationKind, from: &str) -> StorageResult<Vec<Edge>>;

    /// Whether `from` has at least one outgoing edge of any of `kinds`
    async fn has_any_edge_from(&self, kinds: &[RelationKind], from: &str) -> StorageResult<bool>;

    /// Remember an edge that was skipped because its target is missing
    async fn record_unresolved(&self, reference: UnresolvedRef) -> StorageResult<()>;

    /// Evaluate `query`, add `tag` to every match and return the matched names
    async fn tag(&self, tag: NodeTag, query: &TagQuery) -> StorageResult<BTreeSet<String>>;

    /// Set the relation-extraction status of a root word
    async fn set_extraction_status(&self, name: &str, status: ProcessingStatus)
        -> StorageResult<()>;

    /// Entity, edge, tag and unresolved-reference counts
    async fn stats(&self) -> StorageResult<GraphStats>;

    /// Look up an entity that must exist
    async fn require(&self, kind: EntityKind, name: &str) -> StorageResult<Entity> {
        self.get(kind, name)
            .await?
            .ok_or_else(|| StorageError::not_found(kind, name))
    }
}

/// Reject an edge whose endpoints do not match its relation kind
pub fn check_endpoints(kind: &RelationKind, from: &Entity, to: &Entity) -> StorageResult<()> {
    let (from_kind, to_kind) = kind.endpoints();
    if from.kind != from_kind || to.kind != to_kind {
        return Err(StorageError::InvalidOperation(format!(
            "{} edge must connect {} -> {}, got {} '{}' -> {} '{}'",
            kind, from_kind, to_kind, from.kind, from.name, to.kind, to.name
        )));
    }
    Ok(())
}
