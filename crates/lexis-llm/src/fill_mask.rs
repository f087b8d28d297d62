//! Fill-mask service client
//!
//! Request body:
//!
//! ```json
//! {"sentences": [{"sentence": "A {mask} is a kind of dog."}], "top_k": 5, "targets": ["animal"]}
//! ```
//!
//! The service swaps `{mask}` for its model's mask token and answers with
//! the input sentences, each carrying `results.mask_results`: one candidate
//! list per mask position. A failed batch comes back as `{"error": ".."}`.

use async_trait::async_trait;
use lexis_config::RelationsConfig;
use lexis_core::{MaskPredictor, Prediction, ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct FillRequest<'a> {
    sentences: Vec<SentenceInput<'a>>,
    top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    targets: Option<&'a [String]>,
}

#[derive(Serialize)]
struct SentenceInput<'a> {
    sentence: &'a str,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FillResponse {
    Failed { error: String },
    Filled { sentences: Vec<FilledSentence> },
}

#[derive(Deserialize)]
struct FilledSentence {
    results: MaskResults,
}

#[derive(Deserialize)]
struct MaskResults {
    mask_results: Vec<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    token_str: String,
    score: f64,
}

pub struct HttpMaskPredictor {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpMaskPredictor {
    pub fn new(endpoint: String, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Create the fill-mask client described by the `[relations]` section
pub fn create_mask_predictor(config: &RelationsConfig) -> Arc<dyn MaskPredictor> {
    Arc::new(HttpMaskPredictor::new(
        config.endpoint.clone(),
        config.timeout_secs,
    ))
}

#[async_trait]
impl MaskPredictor for HttpMaskPredictor {
    async fn fill(
        &self,
        sentences: &[String],
        top_k: usize,
        targets: Option<&[String]>,
    ) -> ServiceResult<Vec<Vec<Prediction>>> {
        let request = FillRequest {
            sentences: sentences
                .iter()
                .map(|s| SentenceInput { sentence: s })
                .collect(),
            top_k,
            // An empty target list means "no restriction"
            targets: targets.filter(|t| !t.is_empty()),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;

        // The service reports model failures as `{"error"}`, sometimes with a 5xx
        let parsed: Option<FillResponse> = serde_json::from_str(&body).ok();
        let filled = match parsed {
            Some(FillResponse::Failed { error }) => return Err(ServiceError::Pipeline(error)),
            Some(FillResponse::Filled { sentences }) if status.is_success() => sentences,
            _ if !status.is_success() => {
                return Err(ServiceError::Http(format!(
                    "Fill-mask service error ({}): {}",
                    status, body
                )))
            }
            _ => {
                return Err(ServiceError::InvalidResponse(format!(
                    "Unexpected fill-mask response: {}",
                    body
                )))
            }
        };

        if filled.len() != sentences.len() {
            return Err(ServiceError::InvalidResponse(format!(
                "sent {} sentences, received {} results",
                sentences.len(),
                filled.len()
            )));
        }

        debug!(sentences = sentences.len(), "Fill-mask batch answered");
        Ok(filled
            .into_iter()
            .map(|sentence| {
                sentence
                    .results
                    .mask_results
                    .into_iter()
                    .flatten()
                    .map(|c| Prediction::new(c.token_str.trim(), c.score))
                    .collect()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "http-fill-mask"
    }
}
