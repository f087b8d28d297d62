//! Relation-extraction enrichment
//!
//! Fills the template table with each RootWordObject, asks the fill-mask
//! service for candidates and connects every candidate that names a known
//! root word under the template's category, weighted by score.
//!
//! Per root word: `unprocessed -> processing -> {processed, skipped_error}`.
//! A root word counts as done when its status is terminal, or when it has
//! no status but already carries a predicted edge from an earlier run.
//! `processing` means an interrupted attempt and is always redone.

use crate::error::EntityError;
use crate::templates::RelationTemplates;
use lexis_config::RelationsConfig;
use lexis_core::{
    Entity, EntityKind, GraphStore, MaskPredictor, NodeTag, ProcessingStatus, ProgressCounter,
    RelationKind, ServiceError, StorageResult,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationOptions {
    pub top_k: usize,
    /// Restrict candidates to these tokens; empty means unrestricted
    pub targets: Vec<String>,
    pub progress_every: usize,
    /// Skip root words finished by an earlier run
    pub resume: bool,
    /// Revisit root words whose last attempt failed
    pub retry_failed: bool,
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self::from(&RelationsConfig::default())
    }
}

impl From<&RelationsConfig> for RelationOptions {
    fn from(config: &RelationsConfig) -> Self {
        Self {
            top_k: config.top_k,
            targets: config.targets.clone(),
            progress_every: config.progress_every,
            resume: config.resume,
            retry_failed: config.retry_failed,
        }
    }
}

/// Outcome of one relation-extraction pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationReport {
    pub root_words: usize,
    pub processed: usize,
    pub already_processed: usize,
    pub edges_connected: usize,
    /// Candidate tokens with no RootWord in the graph
    pub candidates_missing: usize,
    /// Root words marked `skipped_error` by this run
    pub failed: Vec<String>,
}

pub struct RelationExtractor {
    store: Arc<dyn GraphStore>,
    predictor: Arc<dyn MaskPredictor>,
    templates: RelationTemplates,
    markers: Vec<RelationKind>,
    options: RelationOptions,
}

impl RelationExtractor {
    pub fn new(
        store: Arc<dyn GraphStore>,
        predictor: Arc<dyn MaskPredictor>,
        templates: RelationTemplates,
        options: RelationOptions,
    ) -> Self {
        let markers = templates.relation_kinds();
        Self {
            store,
            predictor,
            templates,
            markers,
            options,
        }
    }

    /// Relation kinds this run can create, closed when the table was loaded
    pub fn relation_kinds(&self) -> &[RelationKind] {
        &self.markers
    }

    /// Enrich every unfinished RootWordObject. Only a fatal store error stops the pass.
    pub async fn run(&self) -> StorageResult<RelationReport> {
        let targets = self
            .store
            .tagged(EntityKind::RootWord, NodeTag::RootWordObject)
            .await?;
        info!(
            root_words = targets.len(),
            templates = self.templates.len(),
            service = self.predictor.name(),
            "Starting relation extraction"
        );

        let mut report = RelationReport {
            root_words: targets.len(),
            ..RelationReport::default()
        };
        let mut progress =
            ProgressCounter::new("relation extraction", targets.len(), self.options.progress_every);

        for root in &targets {
            progress.tick();

            match self.process_one(root, &mut report).await {
                Ok(None) => {
                    debug!(root_word = %root.name, "Already processed, skipping");
                    report.already_processed += 1;
                }
                Ok(Some(connected)) => {
                    report.processed += 1;
                    report.edges_connected += connected;
                }
                Err(err) => {
                    let err = err.into_fatal()?;
                    warn!(root_word = %root.name, error = %err, "Couldn't process root word");
                    report.failed.push(root.name.clone());
                }
            }
        }

        progress.finish();
        info!(
            processed = report.processed,
            edges = report.edges_connected,
            failed = report.failed.len(),
            "Relation extraction complete"
        );
        Ok(report)
    }

    /// Extract one root word and record its status. `None` when already done.
    async fn process_one(
        &self,
        root: &Entity,
        report: &mut RelationReport,
    ) -> Result<Option<usize>, EntityError> {
        if self.is_done(root).await? {
            return Ok(None);
        }
        self.store
            .set_extraction_status(&root.name, ProcessingStatus::Processing)
            .await?;

        let extracted = match self.extract_one(root, report).await {
            Ok(connected) => Ok(connected),
            Err(err) => Err(err.into_fatal()?),
        };
        let status = match extracted {
            Ok(_) => ProcessingStatus::Processed,
            Err(_) => ProcessingStatus::SkippedError,
        };
        self.store.set_extraction_status(&root.name, status).await?;
        extracted.map(Some)
    }

    async fn is_done(&self, root: &Entity) -> StorageResult<bool> {
        if !self.options.resume {
            return Ok(false);
        }
        match root.extraction_status {
            Some(ProcessingStatus::Processed) => Ok(true),
            Some(ProcessingStatus::SkippedError) => Ok(!self.options.retry_failed),
            Some(ProcessingStatus::Processing) => Ok(false),
            None => self.store.has_any_edge_from(&self.markers, &root.name).await,
        }
    }

    async fn extract_one(
        &self,
        root: &Entity,
        report: &mut RelationReport,
    ) -> Result<usize, EntityError> {
        let sentences = self.templates.fill(&root.name);
        let targets = (!self.options.targets.is_empty()).then_some(self.options.targets.as_slice());
        let predictions = self
            .predictor
            .fill(&sentences, self.options.top_k, targets)
            .await?;
        if predictions.len() != sentences.len() {
            return Err(ServiceError::InvalidResponse(format!(
                "sent {} sentences, received {} results",
                sentences.len(),
                predictions.len()
            ))
            .into());
        }

        let mut connected = 0;
        for (template, candidates) in self.templates.templates().iter().zip(predictions) {
            let kind = template.relation_kind();
            for candidate in candidates {
                let Some(target) = self.store.get(EntityKind::RootWord, &candidate.token).await?
                else {
                    report.candidates_missing += 1;
                    continue;
                };
                self.store
                    .connect(&kind, root, &target, Some(candidate.score))
                    .await?;
                connected += 1;
            }
        }
        Ok(connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_core::test_support::{seed_root_words, MockMaskPredictor};
    use lexis_core::InMemoryGraphStore;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_failure_is_logged_with_root_word() {
        let store = Arc::new(InMemoryGraphStore::new());
        seed_root_words(store.as_ref(), &["anvil"], &[]).await.unwrap();
        let predictor = Arc::new(MockMaskPredictor::new().failing_for("anvil"));
        let templates = RelationTemplates::parse("A {Target} is a {mask}.;IS_A").unwrap();

        let report = RelationExtractor::new(store, predictor, templates, RelationOptions::default())
            .run()
            .await
            .unwrap();
        assert_eq!(report.failed.len(), 1);
        assert!(logs_contain("Couldn't process root word"));
        assert!(logs_contain("anvil"));
    }

    #[tokio::test]
    async fn test_status_write_fault_fails_only_that_root_word() {
        let store = Arc::new(InMemoryGraphStore::new());
        seed_root_words(store.as_ref(), &["anvil", "hammer"], &[])
            .await
            .unwrap();
        store.set_faulty("anvil");
        let predictor = Arc::new(MockMaskPredictor::new().with_default(&[("anvil", 0.5)]));
        let templates = RelationTemplates::parse("A {Target} is a {mask}.;IS_A").unwrap();

        let report = RelationExtractor::new(
            store.clone(),
            predictor,
            templates,
            RelationOptions::default(),
        )
        .run()
        .await
        .unwrap();

        assert_eq!(report.failed, vec!["anvil".to_string()]);
        assert_eq!(report.processed, 1);
        let hammer = store.require(EntityKind::RootWord, "hammer").await.unwrap();
        assert_eq!(hammer.extraction_status, Some(ProcessingStatus::Processed));
    }

    #[test]
    fn test_relation_kinds_follow_templates() {
        let templates =
            RelationTemplates::parse("A {Target} is a {mask}.;IS_A\nThe {Target} has a {mask}.;HAS")
                .unwrap();
        let extractor = RelationExtractor::new(
            Arc::new(InMemoryGraphStore::new()),
            Arc::new(MockMaskPredictor::new()),
            templates,
            RelationOptions::default(),
        );
        assert_eq!(extractor.relation_kinds().len(), 2);
    }
}
