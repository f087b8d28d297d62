//! Relation-extraction pass against in-memory doubles

use lexis_core::test_support::{seed_root_words, MockMaskPredictor};
use lexis_core::{
    EntityKind, GraphStore, InMemoryGraphStore, ProcessingStatus, RelationCategory, RelationKind,
};
use lexis_enrichment::{RelationExtractor, RelationOptions, RelationTemplates};
use std::sync::Arc;

const TABLE: &str = "# relation templates\n\
    A {Target} is a {mask}.;IS_A\n\
    A {Target} is used for {mask}.;USED_FOR\n";

fn predicted(category: &str) -> RelationKind {
    RelationKind::Predicted(RelationCategory::new(category).unwrap())
}

async fn setup(objects: &[&str], plain: &[&str]) -> Arc<InMemoryGraphStore> {
    let store = Arc::new(InMemoryGraphStore::new());
    seed_root_words(store.as_ref(), objects, plain).await.unwrap();
    store
}

fn extractor(
    store: Arc<InMemoryGraphStore>,
    predictor: Arc<MockMaskPredictor>,
    options: RelationOptions,
) -> RelationExtractor {
    RelationExtractor::new(
        store,
        predictor,
        RelationTemplates::parse(TABLE).unwrap(),
        options,
    )
}

#[tokio::test]
async fn test_connects_candidates_under_template_category() {
    let store = setup(&["hammer"], &["tool", "nails"]).await;
    let predictor = Arc::new(
        MockMaskPredictor::new()
            .with_sentence("A hammer is a {mask}.", &[("tool", 0.7), ("weapon", 0.2)])
            .with_sentence("A hammer is used for {mask}.", &[("nails", 0.5)]),
    );
    let report = extractor(store.clone(), predictor.clone(), RelationOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.edges_connected, 2);
    assert_eq!(report.candidates_missing, 1);

    let is_a = store.edges_from(&predicted("IS_A"), "hammer").await.unwrap();
    assert_eq!(is_a.len(), 1);
    assert_eq!(is_a[0].to, "tool");
    assert_eq!(is_a[0].weight, Some(0.7));
    let used_for = store
        .edges_from(&predicted("USED_FOR"), "hammer")
        .await
        .unwrap();
    assert_eq!(used_for[0].to, "nails");

    // Both sentences went out in a single batch
    assert_eq!(predictor.call_count(), 1);
    assert_eq!(predictor.calls()[0].len(), 2);

    let hammer = store.require(EntityKind::RootWord, "hammer").await.unwrap();
    assert_eq!(hammer.extraction_status, Some(ProcessingStatus::Processed));
}

#[tokio::test]
async fn test_prior_category_edge_skips_prediction() {
    let store = setup(&["hammer", "saw"], &["tool"]).await;
    let hammer = store.require(EntityKind::RootWord, "hammer").await.unwrap();
    let tool = store.require(EntityKind::RootWord, "tool").await.unwrap();
    store
        .connect(&predicted("IS_A"), &hammer, &tool, Some(0.3))
        .await
        .unwrap();

    let predictor = Arc::new(MockMaskPredictor::new().with_default(&[("tool", 0.9)]));
    let report = extractor(store.clone(), predictor.clone(), RelationOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.already_processed, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(predictor.call_count(), 1);
    assert!(predictor.calls()[0].iter().all(|s| s.contains("saw")));

    // The earlier weight is untouched
    let edges = store.edges_from(&predicted("IS_A"), "hammer").await.unwrap();
    assert_eq!(edges[0].weight, Some(0.3));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let store = setup(&["hammer"], &["tool"]).await;
    let predictor = Arc::new(MockMaskPredictor::new().with_default(&[("tool", 0.9)]));
    let extractor = extractor(store.clone(), predictor.clone(), RelationOptions::default());

    extractor.run().await.unwrap();
    let second = extractor.run().await.unwrap();
    assert_eq!(second.already_processed, 1);
    assert_eq!(predictor.call_count(), 1);
}

#[tokio::test]
async fn test_pipeline_error_marks_entity_and_continues() {
    let store = setup(&["anvil", "hammer"], &["tool"]).await;
    let predictor = Arc::new(
        MockMaskPredictor::new()
            .with_default(&[("tool", 0.9)])
            .failing_for("anvil"),
    );
    let report = extractor(store.clone(), predictor.clone(), RelationOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.failed, vec!["anvil".to_string()]);
    assert_eq!(report.processed, 1);

    let anvil = store.require(EntityKind::RootWord, "anvil").await.unwrap();
    assert_eq!(anvil.extraction_status, Some(ProcessingStatus::SkippedError));

    // Failed entities stay skipped unless retry is requested
    let again = extractor(store.clone(), predictor.clone(), RelationOptions::default())
        .run()
        .await
        .unwrap();
    assert_eq!(again.already_processed, 2);
    assert_eq!(predictor.call_count(), 2);

    let retry = RelationOptions {
        retry_failed: true,
        ..RelationOptions::default()
    };
    let retried = extractor(store.clone(), predictor.clone(), retry)
        .run()
        .await
        .unwrap();
    assert_eq!(retried.failed, vec!["anvil".to_string()]);
    assert_eq!(predictor.call_count(), 3);
}

#[tokio::test]
async fn test_interrupted_entity_is_redone() {
    let store = setup(&["hammer"], &["tool"]).await;
    store
        .set_extraction_status("hammer", ProcessingStatus::Processing)
        .await
        .unwrap();

    let predictor = Arc::new(MockMaskPredictor::new().with_default(&[("tool", 0.9)]));
    let report = extractor(store.clone(), predictor.clone(), RelationOptions::default())
        .run()
        .await
        .unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(predictor.call_count(), 1);
}

#[tokio::test]
async fn test_no_resume_reprocesses_everything() {
    let store = setup(&["hammer"], &["tool"]).await;
    let predictor = Arc::new(MockMaskPredictor::new().with_default(&[("tool", 0.9)]));
    extractor(store.clone(), predictor.clone(), RelationOptions::default())
        .run()
        .await
        .unwrap();

    let options = RelationOptions {
        resume: false,
        ..RelationOptions::default()
    };
    extractor(store.clone(), predictor.clone(), options)
        .run()
        .await
        .unwrap();
    assert_eq!(predictor.call_count(), 2);
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.edge_count(&predicted("IS_A")), 1);
}

#[tokio::test]
async fn test_targets_restrict_candidates() {
    let store = setup(&["hammer"], &["tool", "weapon"]).await;
    let predictor = Arc::new(
        MockMaskPredictor::new().with_default(&[("weapon", 0.6), ("tool", 0.4)]),
    );
    let options = RelationOptions {
        targets: vec!["tool".to_string()],
        ..RelationOptions::default()
    };
    extractor(store.clone(), predictor, options).run().await.unwrap();

    let edges = store.edges_from(&predicted("IS_A"), "hammer").await.unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].to, "tool");
}

#[tokio::test]
async fn test_templates_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relations.txt");
    std::fs::write(&path, TABLE).unwrap();

    let templates = RelationTemplates::load(&path).await.unwrap();
    assert_eq!(templates.len(), 2);
    assert!(RelationTemplates::load(&dir.path().join("missing.txt"))
        .await
        .is_err());
}
