//! Entity resolver: get-or-create by key

use lexis_core::{Entity, EntityAttrs, EntityKind, GraphStore, StorageResult};
use std::sync::Arc;
use tracing::debug;

/// Outcome of [`EntityResolver::resolve_or_create`]
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Entity),
    Created(Entity),
}

impl Resolution {
    pub fn entity(&self) -> &Entity {
        match self {
            Self::Found(entity) | Self::Created(entity) => entity,
        }
    }

    pub fn into_entity(self) -> Entity {
        match self {
            Self::Found(entity) | Self::Created(entity) => entity,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// The only creation path used by the wiring and aggregation passes
///
/// An entity is persisted before `resolve_or_create` returns, so callers
/// that go on to walk the entity's relations always find it on a revisit.
#[derive(Clone)]
pub struct EntityResolver {
    store: Arc<dyn GraphStore>,
}

impl EntityResolver {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Return the stored entity for `attrs.name`, creating it from `attrs` if absent.
    ///
    /// An existing entity is returned as stored; `attrs` only seed new ones.
    pub async fn resolve_or_create(
        &self,
        kind: EntityKind,
        attrs: EntityAttrs,
    ) -> StorageResult<Resolution> {
        if let Some(existing) = self.store.get(kind, &attrs.name).await? {
            return Ok(Resolution::Found(existing));
        }
        let created = self.store.upsert(kind, attrs).await?;
        debug!(kind = %kind, name = %created.name, "Created entity");
        Ok(Resolution::Created(created))
    }

    /// Look up without creating. Absence is `Ok(None)`.
    pub async fn lookup(&self, kind: EntityKind, name: &str) -> StorageResult<Option<Entity>> {
        self.store.get(kind, name).await
    }
}
