//! # Lexis Core
//!
//! Domain layer for lexis, a pipeline that materialises a lexical ontology
//! (concepts, lemmas, root words) into a labeled graph and enriches it with
//! weighted relations from word embeddings and masked-language predictions.
//!
//! ## Architecture
//!
//! Core owns the abstractions every other crate depends on:
//!
//! - **types**: entity kinds, the closed [`RelationKind`] enum, tags
//! - **storage**: the [`GraphStore`] contract plus an in-memory backend
//! - **corpus**: the [`LexicalCorpus`] contract, JSON-lines loader, scoping
//! - **services**: [`EmbeddingService`] and [`MaskPredictor`] contracts
//! - **progress**: periodic `processed/total` logging
//! - **test_support**: deterministic doubles and corpus fixtures
//!
//! Backends (SurrealDB, HTTP clients) implement these traits in their own
//! crates; the pipeline crate only ever sees trait objects.

pub mod corpus;
pub mod progress;
pub mod services;
pub mod storage;
pub mod test_support;
pub mod types;

pub use corpus::{
    lemma_key, ConceptRecord, CorpusError, CorpusResult, CorpusScope, InMemoryCorpus, LemmaRecord,
    LemmaRef, LexicalCorpus, ScopedCorpus,
};
pub use progress::ProgressCounter;
pub use services::{
    EmbeddingService, MaskPredictor, Neighbor, Prediction, ServiceError, ServiceResult,
};
pub use storage::{GraphStore, InMemoryGraphStore, StorageError, StorageResult};
pub use types::{
    CategoryError, ConceptRelation, Edge, Entity, EntityAttrs, EntityKind, GraphStats,
    LemmaRelation, NodeTag, ProcessingStatus, RelationCategory, RelationKind, TagQuery,
    UnresolvedRef,
};
