//! Service clients for lexis enrichment
//!
//! Implementations of the [`EmbeddingService`] and [`MaskPredictor`]
//! contracts from `lexis-core`:
//!
//! - [`VectorFileEmbeddings`]: nearest neighbours from a local word2vec text file
//! - [`HttpEmbeddingService`]: nearest neighbours from a remote service
//! - [`HttpMaskPredictor`]: masked-language-model fills from a remote service

pub mod embeddings;
pub mod fill_mask;

pub use embeddings::{create_embedding_service, HttpEmbeddingService, VectorFileEmbeddings};
pub use fill_mask::{create_mask_predictor, HttpMaskPredictor};

pub use lexis_core::{EmbeddingService, MaskPredictor};
