//! Root-word aggregation
//!
//! Every lemma sharing a surface form collapses into one RootWord, linked
//! both ways: `lemma -subset_of-> root` and `root -contains-> lemma`.

use crate::resolver::EntityResolver;
use lexis_core::{
    EntityAttrs, EntityKind, GraphStore, LexicalCorpus, ProgressCounter, RelationKind,
    StorageResult,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    pub lemmas_linked: usize,
    pub root_words_created: usize,
    /// Corpus lemmas with no stored entity
    pub lemmas_missing: usize,
}

pub struct RootWordAggregator {
    store: Arc<dyn GraphStore>,
    resolver: EntityResolver,
    corpus: Arc<dyn LexicalCorpus>,
    progress_every: usize,
}

impl RootWordAggregator {
    pub fn new(store: Arc<dyn GraphStore>, corpus: Arc<dyn LexicalCorpus>) -> Self {
        Self {
            resolver: EntityResolver::new(store.clone()),
            store,
            corpus,
            progress_every: 100,
        }
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    pub async fn run(&self) -> StorageResult<AggregateReport> {
        info!(concepts = self.corpus.len(), "Aggregating root words");
        let mut report = AggregateReport::default();
        let mut progress =
            ProgressCounter::new("root word aggregation", self.corpus.len(), self.progress_every);

        for concept in self.corpus.concepts() {
            progress.tick();
            for lemma in &concept.lemmas {
                let key = lemma.key(&concept.name);
                let Some(lemma_entity) = self.resolver.lookup(EntityKind::Lemma, &key).await?
                else {
                    debug!(lemma = %key, "Lemma not stored, skipping");
                    report.lemmas_missing += 1;
                    continue;
                };

                let root = self
                    .resolver
                    .resolve_or_create(EntityKind::RootWord, EntityAttrs::named(lemma.root_word()))
                    .await?;
                if root.was_created() {
                    report.root_words_created += 1;
                }

                self.store
                    .connect(&RelationKind::SubsetOf, &lemma_entity, root.entity(), None)
                    .await?;
                self.store
                    .connect(&RelationKind::Contains, root.entity(), &lemma_entity, None)
                    .await?;
                report.lemmas_linked += 1;
            }
        }

        progress.finish();
        Ok(report)
    }
}
