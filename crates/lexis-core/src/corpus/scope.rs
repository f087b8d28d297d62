//! Corpus scope restriction (part of speech, first N concepts)

use super::{ConceptRecord, LexicalCorpus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which slice of the corpus a phase walks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusScope {
    /// Allowed parts of speech (`n`, `v`, `a`, `s`, `r`); empty means all
    #[serde(default)]
    pub parts_of_speech: Vec<String>,
    /// Stop after this many in-scope concepts
    #[serde(default)]
    pub limit: Option<usize>,
}

impl CorpusScope {
    pub fn is_unrestricted(&self) -> bool {
        self.parts_of_speech.is_empty() && self.limit.is_none()
    }

    pub fn admits(&self, concept: &ConceptRecord) -> bool {
        if self.parts_of_speech.is_empty() {
            return true;
        }
        concept
            .part_of_speech()
            .is_some_and(|pos| self.parts_of_speech.iter().any(|p| p == pos))
    }
}

/// A corpus view restricted to a scope.
///
/// Passes honour the scope; by-name lookups do not, so targets outside the
/// scope can still be materialised by permissive wiring.
#[derive(Clone)]
pub struct ScopedCorpus {
    inner: Arc<dyn LexicalCorpus>,
    scope: CorpusScope,
}

impl ScopedCorpus {
    pub fn new(inner: Arc<dyn LexicalCorpus>, scope: CorpusScope) -> Self {
        Self { inner, scope }
    }
}

impl LexicalCorpus for ScopedCorpus {
    fn concepts(&self) -> Box<dyn Iterator<Item = ConceptRecord> + Send + '_> {
        let filtered = self
            .inner
            .concepts()
            .filter(move |c| self.scope.admits(c));
        match self.scope.limit {
            Some(limit) => Box::new(filtered.take(limit)),
            None => Box::new(filtered),
        }
    }

    fn concept(&self, name: &str) -> Option<ConceptRecord> {
        self.inner.concept(name)
    }

    fn len(&self) -> usize {
        if self.scope.is_unrestricted() {
            return self.inner.len();
        }
        self.concepts().count()
    }
}
