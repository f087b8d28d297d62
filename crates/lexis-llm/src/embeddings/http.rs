//! Remote nearest-neighbour provider
//!
//! `POST {base_url}/neighbors` with `{"word": .., "k": ..}`; the service
//! answers `{"neighbors": [{"word": .., "score": ..}]}`, or 404 when the
//! word is outside its vocabulary.

use async_trait::async_trait;
use lexis_core::{EmbeddingService, Neighbor, ServiceError, ServiceResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct NeighborsRequest<'a> {
    word: &'a str,
    k: usize,
}

#[derive(Deserialize)]
struct NeighborsResponse {
    neighbors: Vec<Neighbor>,
}

pub struct HttpEmbeddingService {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpEmbeddingService {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl EmbeddingService for HttpEmbeddingService {
    async fn nearest_neighbors(&self, word: &str, k: usize) -> ServiceResult<Vec<Neighbor>> {
        let url = format!("{}/neighbors", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&NeighborsRequest { word, k })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::UnknownWord(word.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ServiceError::Http(format!(
                "Embedding service error ({}): {}",
                status, error_text
            )));
        }

        let body: NeighborsResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        Ok(body.neighbors.into_iter().take(k).collect())
    }

    fn name(&self) -> &str {
        "http-embeddings"
    }
}
