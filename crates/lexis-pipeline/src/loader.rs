//! Batch node loader
//!
//! Bulk-upserts every concept and lemma identity in fixed-size chunks
//! before any relation is wired.

use lexis_core::{
    ConceptRecord, EntityAttrs, EntityKind, GraphStore, LexicalCorpus, ProgressCounter,
    StorageResult,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_BATCH_SIZE: usize = 400;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub concepts: usize,
    pub lemmas: usize,
    pub chunks: usize,
}

pub struct BatchNodeLoader {
    store: Arc<dyn GraphStore>,
    batch_size: usize,
}

impl BatchNodeLoader {
    pub fn new(store: Arc<dyn GraphStore>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// One concept bulk upsert and one lemma bulk upsert per chunk
    pub async fn load(&self, corpus: &dyn LexicalCorpus) -> StorageResult<LoadReport> {
        let total_chunks = corpus.len().div_ceil(self.batch_size);
        info!(
            concepts = corpus.len(),
            batch_size = self.batch_size,
            "Loading nodes"
        );

        let mut report = LoadReport::default();
        let mut progress = ProgressCounter::new("node loading", total_chunks, 1);
        let mut concepts = corpus.concepts();
        loop {
            let chunk: Vec<ConceptRecord> = concepts.by_ref().take(self.batch_size).collect();
            if chunk.is_empty() {
                break;
            }
            progress.tick();
            let (concepts_written, lemmas_written) = self.load_chunk(&chunk).await?;
            report.concepts += concepts_written;
            report.lemmas += lemmas_written;
            report.chunks += 1;
        }

        progress.finish();
        Ok(report)
    }

    async fn load_chunk(&self, chunk: &[ConceptRecord]) -> StorageResult<(usize, usize)> {
        let concept_rows = chunk.iter().map(concept_attrs).collect();
        let lemma_rows = chunk
            .iter()
            .flat_map(|concept| {
                concept
                    .lemmas
                    .iter()
                    .map(|lemma| EntityAttrs::named(lemma.key(&concept.name)))
            })
            .collect();

        let concepts = self
            .store
            .bulk_upsert(EntityKind::Concept, concept_rows)
            .await?;
        let lemmas = self.store.bulk_upsert(EntityKind::Lemma, lemma_rows).await?;
        Ok((concepts, lemmas))
    }
}

/// Identity attributes of a concept; an empty definition is treated as absent
pub fn concept_attrs(record: &ConceptRecord) -> EntityAttrs {
    let attrs = EntityAttrs::named(&record.name);
    if record.definition.is_empty() {
        attrs
    } else {
        attrs.with_definition(&record.definition)
    }
}
