//! Graph domain types
//!
//! The lexical graph has exactly three node kinds and a closed set of
//! relation kinds. Every relation kind maps to a fixed pair of endpoint
//! kinds, so an edge between the wrong node kinds is rejected by the store
//! instead of silently patched into the schema.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Entities
// ============================================================================

/// Node kinds stored in the lexical graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A lexical sense, e.g. `dog.n.01`
    Concept,
    /// A surface form of one concept, keyed `{concept}.{form}`
    Lemma,
    /// Canonical node shared by every sense of a surface form
    RootWord,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Concept, Self::Lemma, Self::RootWord];

    /// Table / label name used by storage backends
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Lemma => "lemma",
            Self::RootWord => "root_word",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean classifications set by the reclassification pass.
///
/// Tags are monotonic: a store only ever adds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeTag {
    /// Concept transitively beneath the designated root concept
    Object,
    /// Root word containing a lemma of an `Object` concept
    RootWordObject,
}

impl NodeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::RootWordObject => "root_word_object",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "object" => Some(Self::Object),
            "root_word_object" => Some(Self::RootWordObject),
            _ => None,
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation-extraction progress of a root word.
///
/// Absent status means unprocessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Processing,
    Processed,
    SkippedError,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::SkippedError => "skipped_error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "processing" => Some(Self::Processing),
            "processed" => Some(Self::Processed),
            "skipped_error" => Some(Self::SkippedError),
            _ => None,
        }
    }

    /// Whether a rerun should leave the entity alone
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed | Self::SkippedError)
    }
}

/// Attributes used to create or merge an entity. The name is the sole identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAttrs {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl EntityAttrs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: None,
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }
}

/// A node as persisted by a [`GraphStore`](crate::storage::GraphStore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<NodeTag>,
    #[serde(default)]
    pub extraction_status: Option<ProcessingStatus>,
}

impl Entity {
    pub fn new(kind: EntityKind, attrs: EntityAttrs) -> Self {
        Self {
            kind,
            name: attrs.name,
            definition: attrs.definition,
            tags: BTreeSet::new(),
            extraction_status: None,
        }
    }

    pub fn has_tag(&self, tag: NodeTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Merge attributes into an existing entity. A missing definition never
    /// clears a stored one.
    pub fn merge(&mut self, attrs: &EntityAttrs) {
        if attrs.definition.is_some() {
            self.definition = attrs.definition.clone();
        }
    }
}

// ============================================================================
// Relations
// ============================================================================

/// Errors raised while validating a relation category name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("relation category name is empty")]
    Empty,

    #[error("relation category '{0}' may only contain ASCII letters, digits and '_'")]
    InvalidCharacter(String),
}

/// Name of a predicted relation category (`IS`, `PART_OF`, ...).
///
/// Categories come from the template table and are fixed once the table is
/// loaded. Names are normalised to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationCategory(String);

impl RelationCategory {
    pub fn new(name: &str) -> Result<Self, CategoryError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::Empty);
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(CategoryError::InvalidCharacter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RelationCategory {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RelationCategory> for String {
    fn from(category: RelationCategory) -> Self {
        category.0
    }
}

impl fmt::Display for RelationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const PREDICTED_PREFIX: &str = "predicted_";

/// Closed set of relation kinds in the lexical graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    HasLemma,
    Hypernym,
    Hyponym,
    MemberHolonym,
    RootHypernym,
    Antonym,
    Pertainym,
    SubsetOf,
    Contains,
    SimilarTo,
    Predicted(RelationCategory),
}

impl RelationKind {
    /// Storage label, stable across runs
    pub fn label(&self) -> String {
        match self {
            Self::Predicted(category) => {
                format!("{}{}", PREDICTED_PREFIX, category.as_str().to_ascii_lowercase())
            }
            other => other.static_label().unwrap_or_default().to_string(),
        }
    }

    fn static_label(&self) -> Option<&'static str> {
        Some(match self {
            Self::HasLemma => "has_lemma",
            Self::Hypernym => "hypernym",
            Self::Hyponym => "hyponym",
            Self::MemberHolonym => "member_holonym",
            Self::RootHypernym => "root_hypernym",
            Self::Antonym => "antonym",
            Self::Pertainym => "pertainym",
            Self::SubsetOf => "subset_of",
            Self::Contains => "contains",
            Self::SimilarTo => "similar_to",
            Self::Predicted(_) => return None,
        })
    }

    /// Parse a storage label back into a relation kind
    pub fn from_label(label: &str) -> Option<Self> {
        let kind = match label {
            "has_lemma" => Self::HasLemma,
            "hypernym" => Self::Hypernym,
            "hyponym" => Self::Hyponym,
            "member_holonym" => Self::MemberHolonym,
            "root_hypernym" => Self::RootHypernym,
            "antonym" => Self::Antonym,
            "pertainym" => Self::Pertainym,
            "subset_of" => Self::SubsetOf,
            "contains" => Self::Contains,
            "similar_to" => Self::SimilarTo,
            other => {
                let category = other.strip_prefix(PREDICTED_PREFIX)?;
                Self::Predicted(RelationCategory::new(category).ok()?)
            }
        };
        Some(kind)
    }

    /// `(source kind, target kind)` every edge of this kind must connect
    pub fn endpoints(&self) -> (EntityKind, EntityKind) {
        use EntityKind::*;
        match self {
            Self::HasLemma => (Concept, Lemma),
            Self::Hypernym | Self::Hyponym | Self::MemberHolonym | Self::RootHypernym => {
                (Concept, Concept)
            }
            Self::Antonym | Self::Pertainym => (Lemma, Lemma),
            Self::SubsetOf => (Lemma, RootWord),
            Self::Contains => (RootWord, Lemma),
            Self::SimilarTo | Self::Predicted(_) => (RootWord, RootWord),
        }
    }

    /// Weighted kinds carry a mutable `weight`
    pub fn is_weighted(&self) -> bool {
        matches!(self, Self::SimilarTo | Self::Predicted(_))
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Concept-to-concept relations read from the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptRelation {
    Hypernym,
    Hyponym,
    MemberHolonym,
    RootHypernym,
}

impl ConceptRelation {
    pub const ALL: [ConceptRelation; 4] = [
        Self::Hypernym,
        Self::Hyponym,
        Self::MemberHolonym,
        Self::RootHypernym,
    ];

    pub fn relation_kind(&self) -> RelationKind {
        match self {
            Self::Hypernym => RelationKind::Hypernym,
            Self::Hyponym => RelationKind::Hyponym,
            Self::MemberHolonym => RelationKind::MemberHolonym,
            Self::RootHypernym => RelationKind::RootHypernym,
        }
    }
}

/// Lemma-to-lemma relations read from the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LemmaRelation {
    Antonym,
    Pertainym,
}

impl LemmaRelation {
    pub const ALL: [LemmaRelation; 2] = [Self::Antonym, Self::Pertainym];

    pub fn relation_kind(&self) -> RelationKind {
        match self {
            Self::Antonym => RelationKind::Antonym,
            Self::Pertainym => RelationKind::Pertainym,
        }
    }
}

/// A persisted edge. Identity is `(kind, from, to)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub kind: RelationKind,
    pub from: String,
    pub to: String,
    pub weight: Option<f64>,
}

/// An edge the defensive wiring pass refused to create because its target
/// was never loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnresolvedRef {
    pub kind: RelationKind,
    pub from: String,
    pub missing: String,
}

/// Graph-wide selection evaluated by [`GraphStore::tag`](crate::storage::GraphStore::tag)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagQuery {
    /// Concepts with a hypernym path of one or more steps reaching `root`.
    /// Unresolved hypernym references count as steps.
    HypernymAncestorsOf { root: String },
    /// Root words that contain a lemma owned by a concept carrying `concept_tag`
    RootWordsOfTaggedConcepts { concept_tag: NodeTag },
}

impl TagQuery {
    /// Kind of entity the query selects
    pub fn target_kind(&self) -> EntityKind {
        match self {
            Self::HypernymAncestorsOf { .. } => EntityKind::Concept,
            Self::RootWordsOfTaggedConcepts { .. } => EntityKind::RootWord,
        }
    }
}

/// Counts reported by `lexis stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStats {
    pub entities: BTreeMap<EntityKind, usize>,
    pub edges: BTreeMap<String, usize>,
    pub tags: BTreeMap<NodeTag, usize>,
    pub unresolved: usize,
}

impl GraphStats {
    pub fn entity_count(&self, kind: EntityKind) -> usize {
        self.entities.get(&kind).copied().unwrap_or(0)
    }

    pub fn edge_count(&self, kind: &RelationKind) -> usize {
        self.edges.get(&kind.label()).copied().unwrap_or(0)
    }

    pub fn tag_count(&self, tag: NodeTag) -> usize {
        self.tags.get(&tag).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_labels_round_trip() {
        let category = RelationCategory::new("part_of").unwrap();
        for kind in [
            RelationKind::HasLemma,
            RelationKind::MemberHolonym,
            RelationKind::SubsetOf,
            RelationKind::Predicted(category),
        ] {
            assert_eq!(RelationKind::from_label(&kind.label()), Some(kind));
        }
    }

    #[test]
    fn predicted_label_is_lowercase() {
        let kind = RelationKind::Predicted(RelationCategory::new("IS").unwrap());
        assert_eq!(kind.label(), "predicted_is");
        assert!(kind.is_weighted());
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(RelationKind::from_label("likes"), None);
        assert_eq!(RelationKind::from_label("predicted_"), None);
    }

    #[test]
    fn category_validation() {
        assert_eq!(RelationCategory::new("  is_a \n").unwrap().as_str(), "IS_A");
        assert_eq!(RelationCategory::new(" "), Err(CategoryError::Empty));
        assert!(matches!(
            RelationCategory::new("has part"),
            Err(CategoryError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn merge_keeps_existing_definition() {
        let mut entity = Entity::new(
            EntityKind::Concept,
            EntityAttrs::named("dog.n.01").with_definition("a domesticated canid"),
        );
        entity.merge(&EntityAttrs::named("dog.n.01"));
        assert_eq!(entity.definition.as_deref(), Some("a domesticated canid"));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(ProcessingStatus::Processed.is_terminal());
        assert!(ProcessingStatus::SkippedError.is_terminal());
    }
}
