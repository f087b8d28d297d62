//! Reclassification
//!
//! Tags every concept below the designated root concept as `Object`, then
//! every root word reachable from an Object concept as `RootWordObject`.
//! Both passes are single graph-wide queries and only ever add tags.

use lexis_core::{GraphStore, NodeTag, StorageResult, TagQuery};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifyReport {
    pub objects: usize,
    pub root_word_objects: usize,
}

pub struct ReclassificationEngine {
    store: Arc<dyn GraphStore>,
    root_concept: String,
}

impl ReclassificationEngine {
    pub fn new(store: Arc<dyn GraphStore>, root_concept: impl Into<String>) -> Self {
        Self {
            store,
            root_concept: root_concept.into(),
        }
    }

    pub fn root_concept(&self) -> &str {
        &self.root_concept
    }

    /// Tag concepts with a hypernym path of one or more steps to the root.
    ///
    /// The root itself is only tagged if it lies on a cycle back to itself.
    pub async fn tag_objects(&self) -> StorageResult<BTreeSet<String>> {
        let tagged = self
            .store
            .tag(
                NodeTag::Object,
                &TagQuery::HypernymAncestorsOf {
                    root: self.root_concept.clone(),
                },
            )
            .await?;
        info!(root = %self.root_concept, count = tagged.len(), "Tagged Object concepts");
        Ok(tagged)
    }

    /// Tag root words containing a lemma of an Object concept
    pub async fn tag_root_word_objects(&self) -> StorageResult<BTreeSet<String>> {
        let tagged = self
            .store
            .tag(
                NodeTag::RootWordObject,
                &TagQuery::RootWordsOfTaggedConcepts {
                    concept_tag: NodeTag::Object,
                },
            )
            .await?;
        info!(count = tagged.len(), "Tagged RootWordObject root words");
        Ok(tagged)
    }

    pub async fn run(&self) -> StorageResult<ClassifyReport> {
        let objects = self.tag_objects().await?;
        let root_word_objects = self.tag_root_word_objects().await?;
        Ok(ClassifyReport {
            objects: objects.len(),
            root_word_objects: root_word_objects.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_core::{EntityAttrs, EntityKind, InMemoryGraphStore, RelationKind};

    async fn concept(store: &InMemoryGraphStore, name: &str) -> lexis_core::Entity {
        store
            .upsert(EntityKind::Concept, EntityAttrs::named(name))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_transitive_ancestors_tagged_sibling_untouched() {
        let store = Arc::new(InMemoryGraphStore::new());
        let a = concept(&store, "a.n.01").await;
        let b = concept(&store, "b.n.01").await;
        let root = concept(&store, "root.n.01").await;
        concept(&store, "c.n.01").await;
        store
            .connect(&RelationKind::Hypernym, &a, &b, None)
            .await
            .unwrap();
        store
            .connect(&RelationKind::Hypernym, &b, &root, None)
            .await
            .unwrap();

        let engine = ReclassificationEngine::new(store.clone(), "root.n.01");
        let tagged = engine.tag_objects().await.unwrap();

        assert_eq!(
            tagged.into_iter().collect::<Vec<_>>(),
            vec!["a.n.01".to_string(), "b.n.01".to_string()]
        );
        let c = store.require(EntityKind::Concept, "c.n.01").await.unwrap();
        assert!(!c.has_tag(NodeTag::Object));
        let root = store.require(EntityKind::Concept, "root.n.01").await.unwrap();
        assert!(!root.has_tag(NodeTag::Object));
    }

    #[tokio::test]
    async fn test_retagging_is_idempotent() {
        let store = Arc::new(InMemoryGraphStore::new());
        lexis_core::test_support::seed_root_words(store.as_ref(), &["dog"], &["cat"])
            .await
            .unwrap();
        let engine = ReclassificationEngine::new(store.clone(), lexis_core::test_support::SEED_ROOT);

        let first = engine.run().await.unwrap();
        let second = engine.run().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.objects, 1);
        assert_eq!(first.root_word_objects, 1);
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.tag_count(NodeTag::RootWordObject), 1);
    }
}
