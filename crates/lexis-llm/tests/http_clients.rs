//! HTTP client tests against wiremock servers

use lexis_core::{EmbeddingService, MaskPredictor, ServiceError};
use lexis_llm::{HttpEmbeddingService, HttpMaskPredictor};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sentences(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_fill_sends_wire_format_and_flattens_masks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fill"))
        .and(body_json(json!({
            "sentences": [
                {"sentence": "A dog is a {mask}."},
                {"sentence": "A dog can {mask} {mask}."}
            ],
            "top_k": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sentences": [
                {
                    "sentence": "A dog is a {mask}.",
                    "results": {"mask_results": [[
                        {"token_str": "animal", "score": 0.6},
                        {"token_str": " pet", "score": 0.2}
                    ]]}
                },
                {
                    "sentence": "A dog can {mask} {mask}.",
                    "results": {"mask_results": [
                        [{"token_str": "run", "score": 0.5}],
                        [{"token_str": "fast", "score": 0.4}]
                    ]}
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let predictor = HttpMaskPredictor::new(format!("{}/fill", server.uri()), 10);
    let results = predictor
        .fill(
            &sentences(&["A dog is a {mask}.", "A dog can {mask} {mask}."]),
            2,
            None,
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    let first: Vec<_> = results[0].iter().map(|p| p.token.as_str()).collect();
    assert_eq!(first, vec!["animal", "pet"]);
    let second: Vec<_> = results[1].iter().map(|p| p.token.as_str()).collect();
    assert_eq!(second, vec!["run", "fast"]);
}

#[tokio::test]
async fn test_fill_forwards_targets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "sentences": [{"sentence": "x {mask}"}],
            "top_k": 5,
            "targets": ["animal"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sentences": [{"results": {"mask_results": [[{"token_str": "animal", "score": 0.9}]]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let predictor = HttpMaskPredictor::new(server.uri(), 10);
    let targets = vec!["animal".to_string()];
    let results = predictor
        .fill(&sentences(&["x {mask}"]), 5, Some(&targets))
        .await
        .unwrap();
    assert_eq!(results[0][0].score, 0.9);
}

#[tokio::test]
async fn test_fill_error_body_is_pipeline_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "CUDA out of memory"})),
        )
        .mount(&server)
        .await;

    let predictor = HttpMaskPredictor::new(server.uri(), 10);
    let err = predictor
        .fill(&sentences(&["x {mask}"]), 5, None)
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Pipeline("CUDA out of memory".to_string()));
}

#[tokio::test]
async fn test_fill_rejects_mismatched_result_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sentences": []})))
        .mount(&server)
        .await;

    let predictor = HttpMaskPredictor::new(server.uri(), 10);
    let err = predictor
        .fill(&sentences(&["x {mask}"]), 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_neighbors_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/neighbors"))
        .and(body_json(json!({"word": "dog", "k": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "neighbors": [{"word": "puppy", "score": 0.8}, {"word": "cat", "score": 0.6}]
        })))
        .mount(&server)
        .await;

    let service = HttpEmbeddingService::new(format!("{}/", server.uri()), 10);
    let neighbors = service.nearest_neighbors("dog", 2).await.unwrap();
    assert_eq!(neighbors.len(), 2);
    assert_eq!(neighbors[0].word, "puppy");
}

#[tokio::test]
async fn test_neighbors_404_is_unknown_word() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/neighbors"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = HttpEmbeddingService::new(server.uri(), 10);
    let err = service.nearest_neighbors("zyzzyva", 3).await.unwrap_err();
    assert_eq!(err, ServiceError::UnknownWord("zyzzyva".to_string()));
}
