//! # Lexis Enrichment
//!
//! Enrichment passes over RootWordObjects:
//!
//! - **similarity**: weighted `similar_to` edges from an [`EmbeddingService`]
//! - **relations**: weighted category edges from a [`MaskPredictor`] filled
//!   with the [`RelationTemplates`] table, resumable per root word
//!
//! Both passes catch service failures per root word and report them; only
//! an unavailable store stops a pass.
//!
//! [`EmbeddingService`]: lexis_core::EmbeddingService
//! [`MaskPredictor`]: lexis_core::MaskPredictor

pub mod error;
pub mod relations;
pub mod similarity;
pub mod templates;

pub use error::EntityError;
pub use relations::{RelationExtractor, RelationOptions, RelationReport};
pub use similarity::{SimilarityEnricher, SimilarityOptions, SimilarityReport};
pub use templates::{RelationTemplate, RelationTemplates, TemplateError};
