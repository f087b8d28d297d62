//! Corpus fixture builders

use crate::corpus::{ConceptRecord, InMemoryCorpus, LemmaRecord, LemmaRef};

/// Fluent builder for [`ConceptRecord`]
///
/// ```rust
/// use lexis_core::test_support::fixtures::ConceptBuilder;
///
/// let dog = ConceptBuilder::new("dog.n.01")
///     .lemma("dog")
///     .hypernym("animal.n.01")
///     .build();
/// assert_eq!(dog.lemmas[0].name, "dog");
/// ```
pub struct ConceptBuilder {
    record: ConceptRecord,
}

impl ConceptBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            record: ConceptRecord::new(name, format!("definition of {}", name)),
        }
    }

    pub fn definition(mut self, definition: &str) -> Self {
        self.record.definition = definition.to_string();
        self
    }

    pub fn lemma(mut self, form: &str) -> Self {
        self.record.lemmas.push(LemmaRecord::new(form));
        self
    }

    /// Add a lemma with antonyms given as `(concept, form)` pairs
    pub fn lemma_with_antonyms(mut self, form: &str, antonyms: &[(&str, &str)]) -> Self {
        let mut lemma = LemmaRecord::new(form);
        lemma.antonyms = antonyms
            .iter()
            .map(|(concept, form)| LemmaRef::new(*concept, *form))
            .collect();
        self.record.lemmas.push(lemma);
        self
    }

    /// Add a lemma with pertainyms given as `(concept, form)` pairs
    pub fn lemma_with_pertainyms(mut self, form: &str, pertainyms: &[(&str, &str)]) -> Self {
        let mut lemma = LemmaRecord::new(form);
        lemma.pertainyms = pertainyms
            .iter()
            .map(|(concept, form)| LemmaRef::new(*concept, *form))
            .collect();
        self.record.lemmas.push(lemma);
        self
    }

    pub fn hypernym(mut self, target: &str) -> Self {
        self.record.hypernyms.push(target.to_string());
        self
    }

    pub fn hyponym(mut self, target: &str) -> Self {
        self.record.hyponyms.push(target.to_string());
        self
    }

    pub fn member_holonym(mut self, target: &str) -> Self {
        self.record.member_holonyms.push(target.to_string());
        self
    }

    pub fn root_hypernym(mut self, target: &str) -> Self {
        self.record.root_hypernyms.push(target.to_string());
        self
    }

    pub fn build(self) -> ConceptRecord {
        self.record
    }
}

/// Build an in-memory corpus from builders.
///
/// # Panics
///
/// Panics on duplicate concept names; fixtures are expected to be well formed.
pub fn corpus(concepts: Vec<ConceptBuilder>) -> InMemoryCorpus {
    InMemoryCorpus::new(concepts.into_iter().map(ConceptBuilder::build).collect())
        .expect("fixture corpus contains duplicate concepts")
}

/// The `dog -> animal -> artifact` corpus used across pipeline tests.
/// `artifact.n.01` is referenced but not part of the corpus.
pub fn dog_animal_corpus() -> InMemoryCorpus {
    corpus(vec![
        ConceptBuilder::new("dog.n.01")
            .lemma("dog")
            .hypernym("animal.n.01"),
        ConceptBuilder::new("animal.n.01")
            .lemma("animal")
            .hypernym("artifact.n.01"),
    ])
}
