//! Corpus held fully in memory with a by-name index

use super::{ConceptRecord, CorpusError, CorpusResult, LexicalCorpus};
use std::collections::HashMap;

/// Concepts in load order plus a name index for recursive lookups
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    concepts: Vec<ConceptRecord>,
    index: HashMap<String, usize>,
}

impl InMemoryCorpus {
    /// Build a corpus, rejecting duplicate concept names
    pub fn new(concepts: Vec<ConceptRecord>) -> CorpusResult<Self> {
        let mut index = HashMap::with_capacity(concepts.len());
        for (position, concept) in concepts.iter().enumerate() {
            if index.insert(concept.name.clone(), position).is_some() {
                return Err(CorpusError::Duplicate(concept.name.clone()));
            }
        }
        Ok(Self { concepts, index })
    }
}

impl LexicalCorpus for InMemoryCorpus {
    fn concepts(&self) -> Box<dyn Iterator<Item = ConceptRecord> + Send + '_> {
        Box::new(self.concepts.iter().cloned())
    }

    fn concept(&self, name: &str) -> Option<ConceptRecord> {
        self.index
            .get(name)
            .and_then(|&position| self.concepts.get(position))
            .cloned()
    }

    fn len(&self) -> usize {
        self.concepts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_are_restartable() {
        let corpus = InMemoryCorpus::new(vec![
            ConceptRecord::new("dog.n.01", "a canine"),
            ConceptRecord::new("cat.n.01", "a feline"),
        ])
        .unwrap();

        let first: Vec<_> = corpus.concepts().map(|c| c.name).collect();
        let second: Vec<_> = corpus.concepts().map(|c| c.name).collect();
        assert_eq!(first, second);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.concept("cat.n.01").unwrap().definition, "a feline");
        assert!(corpus.concept("cow.n.01").is_none());
    }

    #[test]
    fn test_duplicate_concepts_rejected() {
        let result = InMemoryCorpus::new(vec![
            ConceptRecord::new("dog.n.01", ""),
            ConceptRecord::new("dog.n.01", ""),
        ]);
        assert!(matches!(result, Err(CorpusError::Duplicate(name)) if name == "dog.n.01"));
    }
}
