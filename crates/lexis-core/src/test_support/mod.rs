//! Test support: service doubles and corpus fixtures
//!
//! Compiled unconditionally so integration tests in downstream crates can
//! use the same doubles as the unit tests here.

pub mod fixtures;
pub mod graph;
pub mod mocks;

pub use fixtures::{corpus, dog_animal_corpus, ConceptBuilder};
pub use graph::{seed_root_words, SEED_ROOT};
pub use mocks::{MockEmbeddingService, MockMaskPredictor};
