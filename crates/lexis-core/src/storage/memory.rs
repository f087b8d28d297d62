//! In-memory graph store
//!
//! Backs tests and small single-process runs. All state lives behind one
//! `RwLock`; every trait method takes the lock once, so individual writes
//! are atomic.

use super::traits::{check_endpoints, GraphStore};
use super::{StorageError, StorageResult};
use crate::types::{
    Edge, Entity, EntityAttrs, EntityKind, GraphStats, NodeTag, ProcessingStatus, RelationKind,
    TagQuery, UnresolvedRef,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct MemoryState {
    entities: HashMap<EntityKind, BTreeMap<String, Entity>>,
    /// (kind, from) -> to -> weight
    edges: BTreeMap<(RelationKind, String), BTreeMap<String, Option<f64>>>,
    unresolved: BTreeSet<UnresolvedRef>,
}

impl MemoryState {
    fn entity(&self, kind: EntityKind, name: &str) -> Option<&Entity> {
        self.entities.get(&kind).and_then(|m| m.get(name))
    }

    fn targets(&self, kind: &RelationKind, from: &str) -> impl Iterator<Item = &String> {
        self.edges
            .get(&(kind.clone(), from.to_string()))
            .into_iter()
            .flat_map(|targets| targets.keys())
    }

    /// Concepts with a hypernym path of length >= 1 to `root`
    fn hypernym_ancestors(&self, root: &str) -> BTreeSet<String> {
        let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
        for ((kind, from), targets) in &self.edges {
            if *kind == RelationKind::Hypernym {
                for to in targets.keys() {
                    reverse.entry(to.as_str()).or_default().push(from.as_str());
                }
            }
        }
        for reference in &self.unresolved {
            if reference.kind == RelationKind::Hypernym {
                reverse
                    .entry(reference.missing.as_str())
                    .or_default()
                    .push(reference.from.as_str());
            }
        }

        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for &child in reverse.get(current).into_iter().flatten() {
                if found.insert(child.to_string()) {
                    queue.push_back(child);
                }
            }
        }
        found.retain(|name| self.entity(EntityKind::Concept, name).is_some());
        found
    }

    fn root_words_of_tagged_concepts(&self, concept_tag: NodeTag) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let concepts = self
            .entities
            .get(&EntityKind::Concept)
            .into_iter()
            .flat_map(|m| m.values())
            .filter(|c| c.has_tag(concept_tag));
        for concept in concepts {
            for lemma in self.targets(&RelationKind::HasLemma, &concept.name) {
                for root in self.targets(&RelationKind::SubsetOf, lemma) {
                    if self.entity(EntityKind::RootWord, root).is_some() {
                        found.insert(root.clone());
                    }
                }
            }
        }
        found
    }
}

/// Operation counters, useful for asserting round trips in tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStoreCalls {
    pub upserts: usize,
    pub bulk_upserts: usize,
    pub connects: usize,
}

/// `GraphStore` backed by ordered in-process maps
#[derive(Default)]
pub struct InMemoryGraphStore {
    state: RwLock<MemoryState>,
    unavailable: AtomicBool,
    faulty: RwLock<BTreeSet<String>>,
    upserts: AtomicUsize,
    bulk_upserts: AtomicUsize,
    connects: AtomicUsize,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing the backend: every later call fails with `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Simulate a backend fault on one root word: its status writes and
    /// edge lookups fail with `Backend` while the rest of the store works
    pub fn set_faulty(&self, name: &str) {
        self.faulty.write().insert(name.to_string());
    }

    pub fn calls(&self) -> MemoryStoreCalls {
        MemoryStoreCalls {
            upserts: self.upserts.load(Ordering::SeqCst),
            bulk_upserts: self.bulk_upserts.load(Ordering::SeqCst),
            connects: self.connects.load(Ordering::SeqCst),
        }
    }

    /// Unresolved references recorded so far
    pub fn unresolved(&self) -> Vec<UnresolvedRef> {
        self.state.read().unresolved.iter().cloned().collect()
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn check_healthy(&self, name: &str) -> StorageResult<()> {
        self.check_available()?;
        if self.faulty.read().contains(name) {
            return Err(StorageError::backend(format!("simulated fault on {}", name)));
        }
        Ok(())
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn upsert(&self, kind: EntityKind, attrs: EntityAttrs) -> StorageResult<Entity> {
        self.check_available()?;
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        let table = state.entities.entry(kind).or_default();
        let entity = table
            .entry(attrs.name.clone())
            .and_modify(|existing| existing.merge(&attrs))
            .or_insert_with(|| Entity::new(kind, attrs));
        Ok(entity.clone())
    }

    async fn get(&self, kind: EntityKind, name: &str) -> StorageResult<Option<Entity>> {
        self.check_available()?;
        Ok(self.state.read().entity(kind, name).cloned())
    }

    async fn bulk_upsert(&self, kind: EntityKind, rows: Vec<EntityAttrs>) -> StorageResult<usize> {
        self.check_available()?;
        self.bulk_upserts.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        let table = state.entities.entry(kind).or_default();
        let written = rows.len();
        for attrs in rows {
            table
                .entry(attrs.name.clone())
                .and_modify(|existing| existing.merge(&attrs))
                .or_insert_with(|| Entity::new(kind, attrs));
        }
        Ok(written)
    }

    async fn entities(&self, kind: EntityKind) -> StorageResult<Vec<Entity>> {
        self.check_available()?;
        let state = self.state.read();
        Ok(state
            .entities
            .get(&kind)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn tagged(&self, kind: EntityKind, tag: NodeTag) -> StorageResult<Vec<Entity>> {
        Ok(self
            .entities(kind)
            .await?
            .into_iter()
            .filter(|e| e.has_tag(tag))
            .collect())
    }

    async fn connect(
        &self,
        kind: &RelationKind,
        from: &Entity,
        to: &Entity,
        weight: Option<f64>,
    ) -> StorageResult<Edge> {
        self.check_available()?;
        check_endpoints(kind, from, to)?;
        self.connects.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.write();
        if state.entity(from.kind, &from.name).is_none() {
            return Err(StorageError::not_found(from.kind, from.name.clone()));
        }
        if state.entity(to.kind, &to.name).is_none() {
            return Err(StorageError::not_found(to.kind, to.name.clone()));
        }

        let slot = state
            .edges
            .entry((kind.clone(), from.name.clone()))
            .or_default()
            .entry(to.name.clone())
            .or_insert(None);
        if weight.is_some() {
            *slot = weight;
        }

        Ok(Edge {
            kind: kind.clone(),
            from: from.name.clone(),
            to: to.name.clone(),
            weight: *slot,
        })
    }

    async fn edges_from(&self, kind: &RelationKind, from: &str) -> StorageResult<Vec<Edge>> {
        self.check_available()?;
        let state = self.state.read();
        Ok(state
            .edges
            .get(&(kind.clone(), from.to_string()))
            .map(|targets| {
                targets
                    .iter()
                    .map(|(to, weight)| Edge {
                        kind: kind.clone(),
                        from: from.to_string(),
                        to: to.clone(),
                        weight: *weight,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn has_any_edge_from(&self, kinds: &[RelationKind], from: &str) -> StorageResult<bool> {
        self.check_healthy(from)?;
        let state = self.state.read();
        Ok(kinds.iter().any(|kind| {
            state
                .edges
                .get(&(kind.clone(), from.to_string()))
                .is_some_and(|targets| !targets.is_empty())
        }))
    }

    async fn record_unresolved(&self, reference: UnresolvedRef) -> StorageResult<()> {
        self.check_available()?;
        self.state.write().unresolved.insert(reference);
        Ok(())
    }

    async fn tag(&self, tag: NodeTag, query: &TagQuery) -> StorageResult<BTreeSet<String>> {
        self.check_available()?;
        let mut state = self.state.write();
        let matched = match query {
            TagQuery::HypernymAncestorsOf { root } => state.hypernym_ancestors(root),
            TagQuery::RootWordsOfTaggedConcepts { concept_tag } => {
                state.root_words_of_tagged_concepts(*concept_tag)
            }
        };

        if let Some(table) = state.entities.get_mut(&query.target_kind()) {
            for name in &matched {
                if let Some(entity) = table.get_mut(name) {
                    entity.tags.insert(tag);
                }
            }
        }
        Ok(matched)
    }

    async fn set_extraction_status(
        &self,
        name: &str,
        status: ProcessingStatus,
    ) -> StorageResult<()> {
        self.check_healthy(name)?;
        let mut state = self.state.write();
        let entity = state
            .entities
            .get_mut(&EntityKind::RootWord)
            .and_then(|m| m.get_mut(name))
            .ok_or_else(|| StorageError::not_found(EntityKind::RootWord, name))?;
        entity.extraction_status = Some(status);
        Ok(())
    }

    async fn stats(&self) -> StorageResult<GraphStats> {
        self.check_available()?;
        let state = self.state.read();
        let mut stats = GraphStats::default();
        for kind in EntityKind::ALL {
            let table = state.entities.get(&kind);
            stats
                .entities
                .insert(kind, table.map(|m| m.len()).unwrap_or(0));
            for entity in table.into_iter().flat_map(|m| m.values()) {
                for tag in &entity.tags {
                    *stats.tags.entry(*tag).or_default() += 1;
                }
            }
        }
        for ((kind, _), targets) in &state.edges {
            *stats.edges.entry(kind.label()).or_default() += targets.len();
        }
        stats.unresolved = state.unresolved.len();
        Ok(stats)
    }
}
