//! Ingestion orchestrator
//!
//! Runs the phases in dependency order:
//!
//! 1. **Load**: bulk-upsert concept and lemma identities
//! 2. **Wire**: connect concepts, lemmas and related concepts
//! 3. **Aggregate**: collapse lemmas into root words
//! 4. **Classify**: tag Object concepts, then RootWordObject root words
//!
//! Enrichment (similarity, relation extraction) runs afterwards as separate
//! commands since both depend on external model services.

use crate::aggregate::{AggregateReport, RootWordAggregator};
use crate::context::PipelineContext;
use crate::loader::{BatchNodeLoader, LoadReport};
use crate::reclassify::{ClassifyReport, ReclassificationEngine};
use crate::wiring::{RelationshipWiring, WiringPolicy, WiringReport};
use anyhow::{Context, Result};
use lexis_core::GraphStats;
use lexis_enrichment::{
    RelationExtractor, RelationOptions, RelationReport, RelationTemplates, SimilarityEnricher,
    SimilarityOptions, SimilarityReport,
};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Wire straight from the corpus without a node load first
    pub skip_load: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub load: Option<LoadReport>,
    pub wiring: WiringReport,
    pub aggregate: AggregateReport,
    pub classify: ClassifyReport,
    pub elapsed_ms: u128,
}

pub struct Pipeline {
    context: PipelineContext,
}

impl Pipeline {
    pub fn new(context: PipelineContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Full ingestion: load, wire, aggregate, classify
    pub async fn ingest(&self, options: IngestOptions) -> Result<IngestReport> {
        let started = Instant::now();
        info!(skip_load = options.skip_load, "Starting ingestion");

        let load = if options.skip_load {
            None
        } else {
            Some(self.load_nodes().await?)
        };
        let policy = WiringPolicy::resolve(
            self.context.config().ingest.wiring_policy,
            !options.skip_load,
        );
        let wiring = self.wire(policy).await?;
        let aggregate = self.aggregate().await?;
        let classify = self.classify().await?;

        let elapsed_ms = started.elapsed().as_millis();
        info!(elapsed_ms, "Ingestion complete");
        Ok(IngestReport {
            load,
            wiring,
            aggregate,
            classify,
            elapsed_ms,
        })
    }

    pub async fn load_nodes(&self) -> Result<LoadReport> {
        let corpus = self.context.corpus()?;
        let report = BatchNodeLoader::new(
            self.context.store(),
            self.context.config().ingest.batch_size,
        )
        .load(corpus.as_ref())
        .await
        .context("Node loading failed")?;
        info!(
            concepts = report.concepts,
            lemmas = report.lemmas,
            chunks = report.chunks,
            "Node loading complete"
        );
        Ok(report)
    }

    pub async fn wire(&self, policy: WiringPolicy) -> Result<WiringReport> {
        let report = RelationshipWiring::new(self.context.store(), self.context.corpus()?, policy)
            .with_progress_every(self.context.config().ingest.progress_every)
            .run()
            .await
            .context("Relationship wiring failed")?;
        info!(
            policy = %policy,
            edges = report.edges_connected,
            skipped = report.skipped_edges,
            "Relationship wiring complete"
        );
        Ok(report)
    }

    pub async fn aggregate(&self) -> Result<AggregateReport> {
        let report = RootWordAggregator::new(self.context.store(), self.context.corpus()?)
            .with_progress_every(self.context.config().ingest.progress_every)
            .run()
            .await
            .context("Root word aggregation failed")?;
        info!(
            root_words = report.root_words_created,
            lemmas = report.lemmas_linked,
            "Root word aggregation complete"
        );
        Ok(report)
    }

    /// Object tagging, then RootWordObject tagging. Needs aggregated root words.
    pub async fn classify(&self) -> Result<ClassifyReport> {
        ReclassificationEngine::new(
            self.context.store(),
            self.context.config().ingest.root_concept.clone(),
        )
        .run()
        .await
        .context("Reclassification failed")
    }

    pub async fn similarity(&self, options: SimilarityOptions) -> Result<SimilarityReport> {
        SimilarityEnricher::new(self.context.store(), self.context.embeddings()?, options)
            .run()
            .await
            .context("Similarity enrichment stopped")
    }

    pub async fn relations(
        &self,
        templates: RelationTemplates,
        options: RelationOptions,
    ) -> Result<RelationReport> {
        RelationExtractor::new(
            self.context.store(),
            self.context.predictor()?,
            templates,
            options,
        )
        .run()
        .await
        .context("Relation extraction stopped")
    }

    pub async fn stats(&self) -> Result<GraphStats> {
        self.context
            .store()
            .stats()
            .await
            .context("Failed to read graph stats")
    }

    pub async fn shutdown(self) -> Result<()> {
        self.context.shutdown().await
    }
}
