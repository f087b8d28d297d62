//! Graph seeding helpers for enrichment tests

use crate::storage::{GraphStore, StorageResult};
use crate::types::{EntityAttrs, EntityKind, NodeTag, RelationKind, TagQuery, UnresolvedRef};

/// Root concept the seeded Object concepts hang beneath
pub const SEED_ROOT: &str = "artifact.n.01";

/// Seed one `{form}.n.01` concept, its lemma and root word per form.
///
/// Concepts for `objects` get an (unresolved) hypernym to [`SEED_ROOT`];
/// both tag passes then run, so exactly those root words end up as
/// RootWordObjects. Root words listed in `plain` exist but are untagged.
pub async fn seed_root_words(
    store: &dyn GraphStore,
    objects: &[&str],
    plain: &[&str],
) -> StorageResult<()> {
    for (form, is_object) in objects
        .iter()
        .map(|f| (*f, true))
        .chain(plain.iter().map(|f| (*f, false)))
    {
        let concept_name = format!("{}.n.01", form);
        let concept = store
            .upsert(EntityKind::Concept, EntityAttrs::named(&concept_name))
            .await?;
        let lemma = store
            .upsert(
                EntityKind::Lemma,
                EntityAttrs::named(crate::corpus::lemma_key(&concept_name, form)),
            )
            .await?;
        let root = store
            .upsert(EntityKind::RootWord, EntityAttrs::named(form))
            .await?;
        store
            .connect(&RelationKind::HasLemma, &concept, &lemma, None)
            .await?;
        store
            .connect(&RelationKind::SubsetOf, &lemma, &root, None)
            .await?;
        store
            .connect(&RelationKind::Contains, &root, &lemma, None)
            .await?;
        if is_object {
            store
                .record_unresolved(UnresolvedRef {
                    kind: RelationKind::Hypernym,
                    from: concept_name,
                    missing: SEED_ROOT.to_string(),
                })
                .await?;
        }
    }

    store
        .tag(
            NodeTag::Object,
            &TagQuery::HypernymAncestorsOf {
                root: SEED_ROOT.to_string(),
            },
        )
        .await?;
    store
        .tag(
            NodeTag::RootWordObject,
            &TagQuery::RootWordsOfTaggedConcepts {
                concept_tag: NodeTag::Object,
            },
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryGraphStore;

    #[tokio::test]
    async fn test_only_object_root_words_are_tagged() {
        let store = InMemoryGraphStore::new();
        seed_root_words(&store, &["dog", "cat"], &["puppy"])
            .await
            .unwrap();

        let tagged: Vec<String> = store
            .tagged(EntityKind::RootWord, NodeTag::RootWordObject)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(tagged, vec!["cat".to_string(), "dog".to_string()]);
        assert!(store
            .get(EntityKind::RootWord, "puppy")
            .await
            .unwrap()
            .is_some());
    }
}
