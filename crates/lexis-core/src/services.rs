//! External service contracts
//!
//! Enrichment talks to two model-backed services. Both are consumed through
//! these traits so that HTTP clients, local vector files and test doubles
//! are interchangeable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by embedding and prediction services
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The model could not process the batch (e.g. upstream resource exhaustion)
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Word '{0}' is not in the model vocabulary")]
    UnknownWord(String),

    #[error("Service not configured: {0}")]
    NotConfigured(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One nearest-neighbour hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub word: String,
    pub score: f64,
}

impl Neighbor {
    pub fn new(word: impl Into<String>, score: f64) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }
}

/// One candidate fill for a masked position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub token: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(token: impl Into<String>, score: f64) -> Self {
        Self {
            token: token.into(),
            score,
        }
    }
}

/// Word-embedding nearest-neighbour search
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Up to `k` neighbours of `word`, best first
    async fn nearest_neighbors(&self, word: &str, k: usize) -> ServiceResult<Vec<Neighbor>>;

    /// Human-readable backend name for logs
    fn name(&self) -> &str;
}

/// Masked-language-model fill service
#[async_trait]
pub trait MaskPredictor: Send + Sync {
    /// Fill every `{mask}` placeholder of every sentence.
    ///
    /// Returns one ranked candidate list per input sentence, in input order.
    /// `targets` restricts candidates to the given tokens when present.
    async fn fill(
        &self,
        sentences: &[String],
        top_k: usize,
        targets: Option<&[String]>,
    ) -> ServiceResult<Vec<Vec<Prediction>>>;

    fn name(&self) -> &str;
}
