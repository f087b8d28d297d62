//! Relationship wiring
//!
//! Walks the corpus a second time and connects concepts to their lemmas,
//! concepts to related concepts and lemmas to related lemmas.
//!
//! Two policies:
//!
//! - **Permissive** resolves or creates every endpoint and walks into
//!   related concepts, so a partial corpus still yields a connected graph.
//! - **Defensive** never creates an entity. A missing source is ignored and
//!   a missing target is logged, counted and recorded as unresolved.
//!
//! Each concept is wired at most once per pass; the visited set and the
//! explicit worklist keep cyclic corpora (A hypernym B, B hypernym A) finite.

use crate::loader::concept_attrs;
use crate::resolver::{EntityResolver, Resolution};
use lexis_config::WiringPolicyConfig;
use lexis_core::{
    ConceptRecord, ConceptRelation, Entity, EntityAttrs, EntityKind, GraphStore, LemmaRelation,
    LexicalCorpus, ProgressCounter, RelationKind, StorageResult, UnresolvedRef,
};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WiringPolicy {
    Permissive,
    Defensive,
}

impl WiringPolicy {
    /// `Auto` is defensive once nodes were preloaded, permissive otherwise
    pub fn resolve(config: WiringPolicyConfig, nodes_preloaded: bool) -> Self {
        match config {
            WiringPolicyConfig::Permissive => Self::Permissive,
            WiringPolicyConfig::Defensive => Self::Defensive,
            WiringPolicyConfig::Auto if nodes_preloaded => Self::Defensive,
            WiringPolicyConfig::Auto => Self::Permissive,
        }
    }
}

impl fmt::Display for WiringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permissive => write!(f, "permissive"),
            Self::Defensive => write!(f, "defensive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WiringReport {
    pub policy: WiringPolicy,
    pub concepts_wired: usize,
    pub concepts_created: usize,
    pub lemmas_created: usize,
    pub edges_connected: usize,
    /// Corpus concepts with no stored entity (defensive only)
    pub missing_sources: usize,
    /// Edges not created because the target is missing (defensive only)
    pub skipped_edges: usize,
    /// Names of the missing targets behind `skipped_edges`
    pub missing_targets: BTreeSet<String>,
}

impl WiringReport {
    fn new(policy: WiringPolicy) -> Self {
        Self {
            policy,
            concepts_wired: 0,
            concepts_created: 0,
            lemmas_created: 0,
            edges_connected: 0,
            missing_sources: 0,
            skipped_edges: 0,
            missing_targets: BTreeSet::new(),
        }
    }

    fn count_resolution(&mut self, kind: EntityKind, resolution: &Resolution) {
        if resolution.was_created() {
            match kind {
                EntityKind::Concept => self.concepts_created += 1,
                EntityKind::Lemma => self.lemmas_created += 1,
                EntityKind::RootWord => {}
            }
        }
    }
}

pub struct RelationshipWiring {
    store: Arc<dyn GraphStore>,
    resolver: EntityResolver,
    corpus: Arc<dyn LexicalCorpus>,
    policy: WiringPolicy,
    progress_every: usize,
}

impl RelationshipWiring {
    pub fn new(
        store: Arc<dyn GraphStore>,
        corpus: Arc<dyn LexicalCorpus>,
        policy: WiringPolicy,
    ) -> Self {
        Self {
            resolver: EntityResolver::new(store.clone()),
            store,
            corpus,
            policy,
            progress_every: 100,
        }
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    pub fn policy(&self) -> WiringPolicy {
        self.policy
    }

    pub async fn run(&self) -> StorageResult<WiringReport> {
        info!(
            policy = %self.policy,
            concepts = self.corpus.len(),
            "Wiring relationships"
        );

        let mut report = WiringReport::new(self.policy);
        let mut visited: HashSet<String> = HashSet::new();
        let mut progress =
            ProgressCounter::new("relationship wiring", self.corpus.len(), self.progress_every);

        for concept in self.corpus.concepts() {
            progress.tick();
            match self.policy {
                WiringPolicy::Permissive => {
                    self.wire_permissive(concept.name, &mut visited, &mut report)
                        .await?
                }
                WiringPolicy::Defensive => {
                    self.wire_defensive(&concept, &mut visited, &mut report)
                        .await?
                }
            }
        }

        progress.finish();
        if report.skipped_edges > 0 {
            info!(
                skipped = report.skipped_edges,
                missing = report.missing_targets.len(),
                "Skipped edges to missing targets"
            );
        }
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Permissive
    // ------------------------------------------------------------------

    async fn wire_permissive(
        &self,
        start: String,
        visited: &mut HashSet<String>,
        report: &mut WiringReport,
    ) -> StorageResult<()> {
        if !visited.insert(start.clone()) {
            return Ok(());
        }

        let mut worklist = VecDeque::from([start]);
        while let Some(name) = worklist.pop_front() {
            let record = self.corpus.concept(&name);
            let source = self.resolve_concept(&name, record.as_ref(), report).await?;
            report.concepts_wired += 1;

            // Targets outside the corpus stay bare nodes
            let Some(record) = record else {
                debug!(concept = %name, "Concept not in corpus, created without relations");
                continue;
            };

            for lemma in &record.lemmas {
                let resolved = self
                    .resolver
                    .resolve_or_create(EntityKind::Lemma, EntityAttrs::named(lemma.key(&record.name)))
                    .await?;
                report.count_resolution(EntityKind::Lemma, &resolved);
                let lemma_entity = resolved.into_entity();
                self.connect(&RelationKind::HasLemma, &source, &lemma_entity, report)
                    .await?;

                for relation in LemmaRelation::ALL {
                    for target in lemma.related(relation) {
                        let resolved = self
                            .resolver
                            .resolve_or_create(EntityKind::Lemma, EntityAttrs::named(target.key()))
                            .await?;
                        report.count_resolution(EntityKind::Lemma, &resolved);
                        self.connect(
                            &relation.relation_kind(),
                            &lemma_entity,
                            resolved.entity(),
                            report,
                        )
                        .await?;
                    }
                }
            }

            for relation in ConceptRelation::ALL {
                for target in record.related(relation) {
                    let target_record = self.corpus.concept(target);
                    let target_entity = self
                        .resolve_concept(target, target_record.as_ref(), report)
                        .await?;
                    self.connect(&relation.relation_kind(), &source, &target_entity, report)
                        .await?;
                    if visited.insert(target.clone()) {
                        worklist.push_back(target.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn resolve_concept(
        &self,
        name: &str,
        record: Option<&ConceptRecord>,
        report: &mut WiringReport,
    ) -> StorageResult<Entity> {
        let attrs = record
            .map(concept_attrs)
            .unwrap_or_else(|| EntityAttrs::named(name));
        let resolved = self
            .resolver
            .resolve_or_create(EntityKind::Concept, attrs)
            .await?;
        report.count_resolution(EntityKind::Concept, &resolved);
        Ok(resolved.into_entity())
    }

    // ------------------------------------------------------------------
    // Defensive
    // ------------------------------------------------------------------

    async fn wire_defensive(
        &self,
        record: &ConceptRecord,
        visited: &mut HashSet<String>,
        report: &mut WiringReport,
    ) -> StorageResult<()> {
        if !visited.insert(record.name.clone()) {
            return Ok(());
        }

        let Some(source) = self.resolver.lookup(EntityKind::Concept, &record.name).await? else {
            debug!(concept = %record.name, "Source concept not stored, skipping");
            report.missing_sources += 1;
            return Ok(());
        };
        report.concepts_wired += 1;

        for lemma in &record.lemmas {
            let key = lemma.key(&record.name);
            let Some(lemma_entity) = self.resolver.lookup(EntityKind::Lemma, &key).await? else {
                self.skip(RelationKind::HasLemma, &record.name, &key, report)
                    .await?;
                continue;
            };
            self.connect(&RelationKind::HasLemma, &source, &lemma_entity, report)
                .await?;

            for relation in LemmaRelation::ALL {
                for target in lemma.related(relation) {
                    let target_key = target.key();
                    match self.resolver.lookup(EntityKind::Lemma, &target_key).await? {
                        Some(target_entity) => {
                            self.connect(
                                &relation.relation_kind(),
                                &lemma_entity,
                                &target_entity,
                                report,
                            )
                            .await?
                        }
                        None => {
                            self.skip(relation.relation_kind(), &key, &target_key, report)
                                .await?
                        }
                    }
                }
            }
        }

        for relation in ConceptRelation::ALL {
            for target in record.related(relation) {
                match self.resolver.lookup(EntityKind::Concept, target).await? {
                    Some(target_entity) => {
                        self.connect(&relation.relation_kind(), &source, &target_entity, report)
                            .await?
                    }
                    None => {
                        self.skip(relation.relation_kind(), &record.name, target, report)
                            .await?
                    }
                }
            }
        }
        Ok(())
    }

    async fn skip(
        &self,
        kind: RelationKind,
        from: &str,
        missing: &str,
        report: &mut WiringReport,
    ) -> StorageResult<()> {
        warn!(relation = %kind, from, missing, "Couldn't find node, skipping edge");
        report.skipped_edges += 1;
        report.missing_targets.insert(missing.to_string());
        self.store
            .record_unresolved(UnresolvedRef {
                kind,
                from: from.to_string(),
                missing: missing.to_string(),
            })
            .await
    }

    async fn connect(
        &self,
        kind: &RelationKind,
        from: &Entity,
        to: &Entity,
        report: &mut WiringReport,
    ) -> StorageResult<()> {
        self.store.connect(kind, from, to, None).await?;
        report.edges_connected += 1;
        Ok(())
    }
}
