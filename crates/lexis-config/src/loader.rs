//! Reading configuration from disk

use crate::LexisConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Default location: `<config dir>/lexis/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lexis").join("config.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<LexisConfig, ConfigError> {
        let config: LexisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load_from_file(path: &Path) -> Result<LexisConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load an explicit file, else the default location if it exists, else defaults
    pub async fn load(explicit: Option<&Path>) -> Result<LexisConfig, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path).await;
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path).await,
            _ => {
                debug!("No config file found, using defaults");
                Ok(LexisConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[ingest]\nbatch_size = 25\n\n[relations]\ntop_k = 3").unwrap();

        let config = ConfigLoader::load_from_file(file.path()).await.unwrap();
        assert_eq!(config.ingest.batch_size, 25);
        assert_eq!(config.relations.top_k, 3);
        assert_eq!(config.similarity.top_k, 10);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = ConfigLoader::load_from_file(Path::new("/nonexistent/lexis.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_values_are_rejected_on_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[similarity]\ntop_k = 0").unwrap();
        let err = ConfigLoader::load_from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
