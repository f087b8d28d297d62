//! Lexical corpus abstraction
//!
//! A corpus is a finite, restartable sequence of concepts. Each call to
//! [`LexicalCorpus::concepts`] starts a fresh pass, which is what lets the
//! node loader and the wiring pass walk the same corpus one after the other.

pub mod jsonl;
pub mod memory;
pub mod scope;

pub use jsonl::load_jsonl;
pub use memory::InMemoryCorpus;
pub use scope::{CorpusScope, ScopedCorpus};

use crate::types::{ConceptRelation, LemmaRelation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("I/O error reading corpus {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed concept on line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Duplicate concept '{0}'")]
    Duplicate(String),
}

pub type CorpusResult<T> = Result<T, CorpusError>;

/// Identity key of a lemma: `{concept}.{form}`
pub fn lemma_key(concept: &str, form: &str) -> String {
    format!("{}.{}", concept, form)
}

/// Reference to a lemma of some (possibly other) concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaRef {
    /// Owning concept name
    pub concept: String,
    /// Surface form
    pub lemma: String,
}

impl LemmaRef {
    pub fn new(concept: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            concept: concept.into(),
            lemma: lemma.into(),
        }
    }

    pub fn key(&self) -> String {
        lemma_key(&self.concept, &self.lemma)
    }
}

/// A surface form of a concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaRecord {
    /// Surface form, e.g. `dog` or `hot_dog`
    pub name: String,
    #[serde(default)]
    pub antonyms: Vec<LemmaRef>,
    #[serde(default)]
    pub pertainyms: Vec<LemmaRef>,
}

impl LemmaRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            antonyms: Vec::new(),
            pertainyms: Vec::new(),
        }
    }

    /// Key of this lemma when owned by `concept`
    pub fn key(&self, concept: &str) -> String {
        lemma_key(concept, &self.name)
    }

    /// Canonical root word collapsing every sense of this surface form
    pub fn root_word(&self) -> &str {
        &self.name
    }

    pub fn related(&self, relation: LemmaRelation) -> &[LemmaRef] {
        match relation {
            LemmaRelation::Antonym => &self.antonyms,
            LemmaRelation::Pertainym => &self.pertainyms,
        }
    }
}

/// A lexical sense with its outgoing relations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub name: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub lemmas: Vec<LemmaRecord>,
    #[serde(default)]
    pub hypernyms: Vec<String>,
    #[serde(default)]
    pub hyponyms: Vec<String>,
    #[serde(default)]
    pub member_holonyms: Vec<String>,
    #[serde(default)]
    pub root_hypernyms: Vec<String>,
}

impl ConceptRecord {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            lemmas: Vec::new(),
            hypernyms: Vec::new(),
            hyponyms: Vec::new(),
            member_holonyms: Vec::new(),
            root_hypernyms: Vec::new(),
        }
    }

    pub fn related(&self, relation: ConceptRelation) -> &[String] {
        match relation {
            ConceptRelation::Hypernym => &self.hypernyms,
            ConceptRelation::Hyponym => &self.hyponyms,
            ConceptRelation::MemberHolonym => &self.member_holonyms,
            ConceptRelation::RootHypernym => &self.root_hypernyms,
        }
    }

    /// Part of speech encoded in the concept name (`dog.n.01` -> `n`)
    pub fn part_of_speech(&self) -> Option<&str> {
        let mut parts = self.name.rsplitn(3, '.');
        let _sense = parts.next()?;
        let pos = parts.next()?;
        parts.next()?;
        Some(pos)
    }
}

/// Source of concepts for every ingestion phase
pub trait LexicalCorpus: Send + Sync {
    /// Fresh pass over every concept in corpus order
    fn concepts(&self) -> Box<dyn Iterator<Item = ConceptRecord> + Send + '_>;

    /// Look up one concept by name, regardless of any scope restriction
    fn concept(&self, name: &str) -> Option<ConceptRecord>;

    /// Number of concepts a full pass yields
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
