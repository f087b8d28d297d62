//! Mock service implementations for testing
//!
//! Deterministic, in-memory stand-ins for the embedding and prediction
//! services. Both record every call so tests can assert on round trips, and
//! both support error injection per word.

use crate::services::{
    EmbeddingService, MaskPredictor, Neighbor, Prediction, ServiceError, ServiceResult,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

// ============================================================================
// Mock Embedding Service
// ============================================================================

/// Embedding service answering from a fixed neighbour table
///
/// Words without an entry return an empty neighbour list.
#[derive(Default)]
pub struct MockEmbeddingService {
    neighbors: HashMap<String, Vec<Neighbor>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockEmbeddingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the neighbours returned for `word`
    pub fn with_neighbors(mut self, word: &str, neighbors: &[(&str, f64)]) -> Self {
        self.neighbors.insert(
            word.to_string(),
            neighbors
                .iter()
                .map(|(w, s)| Neighbor::new(*w, *s))
                .collect(),
        );
        self
    }

    /// Make lookups for `word` fail with `UnknownWord`
    pub fn failing_for(mut self, word: &str) -> Self {
        self.failing.insert(word.to_string());
        self
    }

    /// Words queried so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    async fn nearest_neighbors(&self, word: &str, k: usize) -> ServiceResult<Vec<Neighbor>> {
        self.calls.lock().push(word.to_string());
        if self.failing.contains(word) {
            return Err(ServiceError::UnknownWord(word.to_string()));
        }
        Ok(self
            .neighbors
            .get(word)
            .map(|n| n.iter().take(k).cloned().collect())
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock-embeddings"
    }
}

// ============================================================================
// Mock Mask Predictor
// ============================================================================

/// Prediction service answering from a sentence table
///
/// A sentence without an exact entry gets the default candidates. Batches
/// containing a sentence that mentions a failing word raise a pipeline error
/// for the whole call.
#[derive(Default)]
pub struct MockMaskPredictor {
    by_sentence: HashMap<String, Vec<Prediction>>,
    default: Vec<Prediction>,
    failing_words: HashSet<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockMaskPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates returned for one exact filled sentence
    pub fn with_sentence(mut self, sentence: &str, predictions: &[(&str, f64)]) -> Self {
        self.by_sentence.insert(
            sentence.to_string(),
            predictions
                .iter()
                .map(|(t, s)| Prediction::new(*t, *s))
                .collect(),
        );
        self
    }

    /// Candidates returned for every sentence without an exact entry
    pub fn with_default(mut self, predictions: &[(&str, f64)]) -> Self {
        self.default = predictions
            .iter()
            .map(|(t, s)| Prediction::new(*t, *s))
            .collect();
        self
    }

    /// Fail any batch mentioning `word`
    pub fn failing_for(mut self, word: &str) -> Self {
        self.failing_words.insert(word.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Sentence batches received so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MaskPredictor for MockMaskPredictor {
    async fn fill(
        &self,
        sentences: &[String],
        top_k: usize,
        targets: Option<&[String]>,
    ) -> ServiceResult<Vec<Vec<Prediction>>> {
        self.calls.lock().push(sentences.to_vec());

        let mentions_failing = sentences.iter().any(|s| {
            s.split(|c: char| !c.is_alphanumeric() && c != '_')
                .any(|token| self.failing_words.contains(token))
        });
        if mentions_failing {
            return Err(ServiceError::Pipeline(
                "CUDA out of memory while processing batch".to_string(),
            ));
        }

        Ok(sentences
            .iter()
            .map(|sentence| {
                self.by_sentence
                    .get(sentence)
                    .unwrap_or(&self.default)
                    .iter()
                    .filter(|p| targets.map_or(true, |t| t.contains(&p.token)))
                    .take(top_k)
                    .cloned()
                    .collect()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "mock-fill-mask"
    }
}
