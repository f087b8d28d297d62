//! Shared setup for pipeline integration tests

#![allow(dead_code)]

use lexis_config::{LexisConfig, StoreBackend, WiringPolicyConfig};
use lexis_core::{Entity, EntityKind, GraphStore, InMemoryCorpus, InMemoryGraphStore, NodeTag};
use lexis_pipeline::{Pipeline, PipelineContext};
use std::sync::Arc;

pub fn memory_config(root_concept: &str) -> LexisConfig {
    let mut config = LexisConfig::default();
    config.store.backend = StoreBackend::Memory;
    config.ingest.root_concept = root_concept.to_string();
    config
}

/// Pipeline over a fresh in-memory store, returned alongside the store
pub fn memory_pipeline(corpus: InMemoryCorpus) -> (Pipeline, Arc<InMemoryGraphStore>) {
    memory_pipeline_with(corpus, memory_config("artifact.n.01"))
}

pub fn memory_pipeline_with(
    corpus: InMemoryCorpus,
    config: LexisConfig,
) -> (Pipeline, Arc<InMemoryGraphStore>) {
    let store = Arc::new(InMemoryGraphStore::new());
    let context = PipelineContext::new(config, store.clone()).with_corpus(Arc::new(corpus));
    (Pipeline::new(context), store)
}

pub fn permissive_config(root_concept: &str) -> LexisConfig {
    let mut config = memory_config(root_concept);
    config.ingest.wiring_policy = WiringPolicyConfig::Permissive;
    config
}

pub async fn tagged_names(store: &dyn GraphStore, kind: EntityKind, tag: NodeTag) -> Vec<String> {
    store
        .tagged(kind, tag)
        .await
        .unwrap()
        .into_iter()
        .map(|e: Entity| e.name)
        .collect()
}
