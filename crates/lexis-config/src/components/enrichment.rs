//! Similarity and relation-extraction enrichment settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where nearest neighbours come from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    /// Local word2vec-format text file
    #[default]
    Vectors,
    /// Remote neighbour service
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingBackendConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderType,
    /// Vector file for the `vectors` provider
    pub vectors_path: Option<PathBuf>,
    /// Base URL for the `http` provider
    pub api_url: Option<String>,
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_timeout() -> u64 {
    30
}

impl Default for EmbeddingBackendConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::default(),
            vectors_path: None,
            api_url: None,
            timeout_secs: default_embedding_timeout(),
        }
    }
}

impl EmbeddingBackendConfig {
    pub fn get_api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or("http://localhost:5001")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityConfig {
    /// Neighbours requested per root word
    #[serde(default = "default_similarity_top_k")]
    pub top_k: usize,
    #[serde(default = "default_similarity_progress")]
    pub progress_every: usize,
    /// Skip root words that already carry similar-to edges
    #[serde(default)]
    pub resume: bool,
    #[serde(default)]
    pub embeddings: EmbeddingBackendConfig,
}

fn default_similarity_top_k() -> usize {
    10
}

fn default_similarity_progress() -> usize {
    100
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            top_k: default_similarity_top_k(),
            progress_every: default_similarity_progress(),
            resume: false,
            embeddings: EmbeddingBackendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationsConfig {
    /// Category/sentence template table
    pub template_path: Option<PathBuf>,
    /// Candidate fills requested per sentence
    #[serde(default = "default_relations_top_k")]
    pub top_k: usize,
    /// Restrict candidates to these tokens
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default = "default_relations_progress")]
    pub progress_every: usize,
    /// Skip root words already processed by an earlier run
    #[serde(default = "default_true")]
    pub resume: bool,
    /// Revisit root words whose last attempt failed
    #[serde(default)]
    pub retry_failed: bool,
    /// Fill-mask service endpoint
    #[serde(default = "default_fill_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_fill_timeout")]
    pub timeout_secs: u64,
}

fn default_relations_top_k() -> usize {
    5
}

fn default_relations_progress() -> usize {
    200
}

fn default_true() -> bool {
    true
}

fn default_fill_endpoint() -> String {
    "http://localhost:5000/fill".to_string()
}

fn default_fill_timeout() -> u64 {
    120
}

impl Default for RelationsConfig {
    fn default() -> Self {
        Self {
            template_path: None,
            top_k: default_relations_top_k(),
            targets: Vec::new(),
            progress_every: default_relations_progress(),
            resume: true,
            retry_failed: false,
            endpoint: default_fill_endpoint(),
            timeout_secs: default_fill_timeout(),
        }
    }
}
