//! Configuration for the lexis ingestion and enrichment pipeline
//!
//! One TOML document with a section per concern. Every field has a default,
//! so an empty file (or no file at all) yields a working configuration.

pub mod components;
mod loader;

pub use components::*;
pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

/// Top-level configuration document
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LexisConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub relations: RelationsConfig,
}

impl LexisConfig {
    /// Reject settings no phase can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest.batch_size == 0 {
            return Err(ConfigError::Invalid("ingest.batch_size must be positive".into()));
        }
        if self.ingest.root_concept.trim().is_empty() {
            return Err(ConfigError::Invalid("ingest.root_concept must not be empty".into()));
        }
        if self.similarity.top_k == 0 {
            return Err(ConfigError::Invalid("similarity.top_k must be positive".into()));
        }
        if self.relations.top_k == 0 {
            return Err(ConfigError::Invalid("relations.top_k must be positive".into()));
        }
        if self.store.backend == StoreBackend::SurrealDb && self.store.namespace.is_empty() {
            return Err(ConfigError::Invalid("store.namespace must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: LexisConfig = toml::from_str("").unwrap();
        assert_eq!(config, LexisConfig::default());
        assert_eq!(config.ingest.batch_size, 400);
        assert_eq!(config.ingest.root_concept, "artifact.n.01");
        assert_eq!(config.similarity.top_k, 10);
        assert_eq!(config.relations.top_k, 5);
        assert_eq!(config.relations.progress_every, 200);
        assert!(config.relations.resume);
        assert!(!config.relations.retry_failed);
    }

    #[test]
    fn test_sections_parse() {
        let toml_content = r#"
[store]
backend = "memory"

[corpus]
path = "wordnet.jsonl"
parts_of_speech = ["n"]
limit = 50

[ingest]
batch_size = 100
wiring_policy = "defensive"

[similarity]
top_k = 3
resume = true

[similarity.embeddings]
provider = "http"
api_url = "http://vectors:8080"

[relations]
template_path = "templates.txt"
targets = ["animal", "tool"]
retry_failed = true
"#;
        let config: LexisConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.store.is_in_memory());
        assert_eq!(config.corpus.limit, Some(50));
        assert_eq!(config.corpus.parts_of_speech, vec!["n".to_string()]);
        assert_eq!(config.ingest.batch_size, 100);
        assert_eq!(config.ingest.wiring_policy, WiringPolicyConfig::Defensive);
        assert_eq!(config.similarity.embeddings.provider, EmbeddingProviderType::Http);
        assert_eq!(config.similarity.embeddings.get_api_url(), "http://vectors:8080");
        assert_eq!(config.relations.targets.len(), 2);
        assert!(config.relations.retry_failed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let mut config = LexisConfig::default();
        config.ingest.batch_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let result: Result<LexisConfig, _> = toml::from_str("[ingest]\nwiring_policy = \"eager\"");
        assert!(result.is_err());
    }
}
