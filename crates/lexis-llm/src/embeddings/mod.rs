//! Nearest-neighbour providers

pub mod http;
pub mod vectors;

pub use http::HttpEmbeddingService;
pub use vectors::VectorFileEmbeddings;

use lexis_config::{EmbeddingBackendConfig, EmbeddingProviderType};
use lexis_core::{EmbeddingService, ServiceError, ServiceResult};
use std::sync::Arc;

/// Create an embedding service from configuration
///
/// The vector file provider defers reading its file until the first lookup.
pub fn create_embedding_service(
    config: &EmbeddingBackendConfig,
) -> ServiceResult<Arc<dyn EmbeddingService>> {
    match config.provider {
        EmbeddingProviderType::Vectors => {
            let path = config.vectors_path.clone().ok_or_else(|| {
                ServiceError::NotConfigured(
                    "similarity.embeddings.vectors_path is required for the vectors provider"
                        .to_string(),
                )
            })?;
            Ok(Arc::new(VectorFileEmbeddings::new(path)))
        }
        EmbeddingProviderType::Http => Ok(Arc::new(HttpEmbeddingService::new(
            config.get_api_url().to_string(),
            config.timeout_secs,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_provider_requires_path() {
        let config = EmbeddingBackendConfig::default();
        let err = create_embedding_service(&config).err().unwrap();
        assert!(matches!(err, ServiceError::NotConfigured(_)));
    }

    #[test]
    fn test_http_provider_uses_default_url() {
        let config = EmbeddingBackendConfig {
            provider: EmbeddingProviderType::Http,
            ..EmbeddingBackendConfig::default()
        };
        let service = create_embedding_service(&config).unwrap();
        assert_eq!(service.name(), "http-embeddings");
    }
}
