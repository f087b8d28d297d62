//! Similarity enrichment
//!
//! Connects every RootWordObject to the root words an embedding service
//! names as its nearest neighbours, weighted by similarity score.

use crate::error::EntityError;
use lexis_config::SimilarityConfig;
use lexis_core::{
    EmbeddingService, Entity, EntityKind, GraphStore, NodeTag, ProgressCounter, RelationKind,
    ServiceError, StorageResult,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityOptions {
    pub top_k: usize,
    pub progress_every: usize,
    /// Skip root words that already carry similar-to edges
    pub resume: bool,
}

impl Default for SimilarityOptions {
    fn default() -> Self {
        Self::from(&SimilarityConfig::default())
    }
}

impl From<&SimilarityConfig> for SimilarityOptions {
    fn from(config: &SimilarityConfig) -> Self {
        Self {
            top_k: config.top_k,
            progress_every: config.progress_every,
            resume: config.resume,
        }
    }
}

/// Outcome of one similarity pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityReport {
    pub root_words: usize,
    pub enriched: usize,
    pub resumed: usize,
    pub edges_connected: usize,
    /// Neighbours with no RootWord in the graph
    pub neighbors_missing: usize,
    /// Root words outside the embedding vocabulary
    pub unknown_words: Vec<String>,
    /// Root words whose lookup failed for any other reason
    pub failed: Vec<String>,
}

pub struct SimilarityEnricher {
    store: Arc<dyn GraphStore>,
    embeddings: Arc<dyn EmbeddingService>,
    options: SimilarityOptions,
}

impl SimilarityEnricher {
    pub fn new(
        store: Arc<dyn GraphStore>,
        embeddings: Arc<dyn EmbeddingService>,
        options: SimilarityOptions,
    ) -> Self {
        Self {
            store,
            embeddings,
            options,
        }
    }

    /// Enrich every RootWordObject. Only a fatal store error stops the pass.
    pub async fn run(&self) -> StorageResult<SimilarityReport> {
        let targets = self
            .store
            .tagged(EntityKind::RootWord, NodeTag::RootWordObject)
            .await?;
        info!(
            root_words = targets.len(),
            service = self.embeddings.name(),
            "Starting similarity enrichment"
        );

        let mut report = SimilarityReport {
            root_words: targets.len(),
            ..SimilarityReport::default()
        };
        let mut progress =
            ProgressCounter::new("similarity", targets.len(), self.options.progress_every);

        for root in &targets {
            progress.tick();

            let outcome = match self.already_enriched(root).await {
                Ok(true) => {
                    debug!(root_word = %root.name, "Already has similar-to edges, skipping");
                    report.resumed += 1;
                    continue;
                }
                Ok(false) => self.enrich_one(root, &mut report).await,
                Err(err) => Err(err.into()),
            };

            match outcome {
                Ok(connected) => {
                    report.enriched += 1;
                    report.edges_connected += connected;
                }
                Err(err) => match err.into_fatal()? {
                    EntityError::Service(ServiceError::UnknownWord(_)) => {
                        debug!(root_word = %root.name, "Not in embedding vocabulary");
                        report.unknown_words.push(root.name.clone());
                    }
                    other => {
                        warn!(root_word = %root.name, error = %other, "Similarity enrichment failed");
                        report.failed.push(root.name.clone());
                    }
                },
            }
        }

        progress.finish();
        info!(
            edges = report.edges_connected,
            failed = report.failed.len(),
            "Similarity enrichment complete"
        );
        Ok(report)
    }

    async fn already_enriched(&self, root: &Entity) -> StorageResult<bool> {
        if !self.options.resume {
            return Ok(false);
        }
        self.store
            .has_any_edge_from(&[RelationKind::SimilarTo], &root.name)
            .await
    }

    async fn enrich_one(
        &self,
        root: &Entity,
        report: &mut SimilarityReport,
    ) -> Result<usize, EntityError> {
        let neighbors = self
            .embeddings
            .nearest_neighbors(&root.name, self.options.top_k)
            .await?;

        let mut connected = 0;
        for neighbor in neighbors {
            let Some(target) = self.store.get(EntityKind::RootWord, &neighbor.word).await? else {
                report.neighbors_missing += 1;
                continue;
            };
            self.store
                .connect(&RelationKind::SimilarTo, root, &target, Some(neighbor.score))
                .await?;
            connected += 1;
        }
        Ok(connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_core::test_support::{seed_root_words, MockEmbeddingService};
    use lexis_core::InMemoryGraphStore;

    /// `dog` and `cat` are RootWordObjects, `puppy` is a plain root word
    async fn seeded_store() -> Arc<InMemoryGraphStore> {
        let store = Arc::new(InMemoryGraphStore::new());
        seed_root_words(store.as_ref(), &["dog", "cat"], &["puppy"])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_connects_known_neighbors_with_scores() {
        let store = seeded_store().await;
        let embeddings = Arc::new(
            MockEmbeddingService::new()
                .with_neighbors("dog", &[("puppy", 0.9), ("wolf", 0.8), ("cat", 0.6)])
                .with_neighbors("cat", &[("kitten", 0.9)]),
        );
        let enricher =
            SimilarityEnricher::new(store.clone(), embeddings, SimilarityOptions::default());

        let report = enricher.run().await.unwrap();
        assert_eq!(report.root_words, 2);
        assert_eq!(report.edges_connected, 2);
        assert_eq!(report.neighbors_missing, 2);

        let edges = store.edges_from(&RelationKind::SimilarTo, "dog").await.unwrap();
        let pairs: Vec<_> = edges.iter().map(|e| (e.to.as_str(), e.weight)).collect();
        assert_eq!(pairs, vec![("cat", Some(0.6)), ("puppy", Some(0.9))]);
    }

    #[tokio::test]
    async fn test_rerun_does_not_duplicate_edges() {
        let store = seeded_store().await;
        let embeddings =
            Arc::new(MockEmbeddingService::new().with_neighbors("dog", &[("puppy", 0.9)]));
        let enricher =
            SimilarityEnricher::new(store.clone(), embeddings, SimilarityOptions::default());

        enricher.run().await.unwrap();
        enricher.run().await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.edge_count(&RelationKind::SimilarTo), 1);
    }

    #[tokio::test]
    async fn test_resume_skips_enriched_root_words() {
        let store = seeded_store().await;
        let embeddings =
            Arc::new(MockEmbeddingService::new().with_neighbors("dog", &[("puppy", 0.9)]));
        let options = SimilarityOptions {
            resume: true,
            ..SimilarityOptions::default()
        };
        let enricher = SimilarityEnricher::new(store.clone(), embeddings.clone(), options);

        enricher.run().await.unwrap();
        let report = enricher.run().await.unwrap();
        assert_eq!(report.resumed, 1);
        assert_eq!(
            embeddings.calls().iter().filter(|w| *w == "dog").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_service_errors_do_not_abort_the_pass() {
        let store = seeded_store().await;
        let embeddings = Arc::new(
            MockEmbeddingService::new()
                .failing_for("cat")
                .with_neighbors("dog", &[("puppy", 0.9)]),
        );
        let enricher =
            SimilarityEnricher::new(store.clone(), embeddings, SimilarityOptions::default());

        let report = enricher.run().await.unwrap();
        assert_eq!(report.unknown_words, vec!["cat".to_string()]);
        assert_eq!(report.enriched, 1);
        assert_eq!(report.edges_connected, 1);
    }

    #[tokio::test]
    async fn test_resume_lookup_fault_fails_only_that_root_word() {
        let store = seeded_store().await;
        store.set_faulty("cat");
        let embeddings = Arc::new(
            MockEmbeddingService::new()
                .with_neighbors("cat", &[("dog", 0.8)])
                .with_neighbors("dog", &[("puppy", 0.9)]),
        );
        let options = SimilarityOptions {
            resume: true,
            ..SimilarityOptions::default()
        };
        let enricher = SimilarityEnricher::new(store.clone(), embeddings, options);

        let report = enricher.run().await.unwrap();
        assert_eq!(report.failed, vec!["cat".to_string()]);
        assert_eq!(report.enriched, 1);
        assert_eq!(report.edges_connected, 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_fatal() {
        let store = seeded_store().await;
        let embeddings =
            Arc::new(MockEmbeddingService::new().with_neighbors("dog", &[("puppy", 0.9)]));
        let enricher =
            SimilarityEnricher::new(store.clone(), embeddings, SimilarityOptions::default());

        store.set_unavailable(true);
        let err = enricher.run().await.unwrap_err();
        assert!(err.is_fatal());
    }
}
