//! Config loading with command-line overrides applied on top

use crate::cli::Overrides;
use anyhow::Result;
use lexis_config::{ConfigLoader, LexisConfig};
use std::path::Path;
use tracing::debug;

/// Load the config file (if any) and apply the shared overrides
pub async fn load(path: Option<&Path>, overrides: &Overrides) -> Result<LexisConfig> {
    let mut config = ConfigLoader::load(path).await?;
    apply_overrides(&mut config, overrides);
    config.validate()?;
    debug!(?config, "Effective configuration");
    Ok(config)
}

pub fn apply_overrides(config: &mut LexisConfig, overrides: &Overrides) {
    if let Some(corpus) = &overrides.corpus {
        config.corpus.path = Some(corpus.clone());
    }
    if !overrides.parts_of_speech.is_empty() {
        config.corpus.parts_of_speech = overrides.parts_of_speech.clone();
    }
    if let Some(limit) = overrides.limit {
        config.corpus.limit = Some(limit);
    }
    if let Some(batch_size) = overrides.batch_size {
        config.ingest.batch_size = batch_size;
    }
    if let Some(db_path) = &overrides.db_path {
        config.store.path = db_path.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = LexisConfig::default();
        config.corpus.parts_of_speech = vec!["v".to_string()];
        let overrides = Overrides {
            corpus: Some(PathBuf::from("nouns.jsonl")),
            parts_of_speech: vec!["n".to_string()],
            limit: Some(10),
            batch_size: Some(50),
            db_path: Some(":memory:".to_string()),
        };

        apply_overrides(&mut config, &overrides);

        assert_eq!(config.corpus.path, Some(PathBuf::from("nouns.jsonl")));
        assert_eq!(config.corpus.parts_of_speech, vec!["n"]);
        assert_eq!(config.corpus.limit, Some(10));
        assert_eq!(config.ingest.batch_size, 50);
        assert!(config.store.is_in_memory());
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = LexisConfig::default();
        apply_overrides(&mut config, &Overrides::default());
        assert_eq!(config, LexisConfig::default());
    }

    #[tokio::test]
    async fn test_zero_batch_size_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\nbackend = \"memory\"\n").unwrap();
        let overrides = Overrides {
            batch_size: Some(0),
            ..Overrides::default()
        };
        assert!(load(Some(&path), &overrides).await.is_err());
    }
}
