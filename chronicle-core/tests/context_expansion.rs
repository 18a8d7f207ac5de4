//! Context expansion tests: growing extracted seed context with the
//! model, one JSON-format request per category.

use chronicle_core::context::expand_context;
use chronicle_core::history::{timeline_digest, EventPayload, HistoryRecord};
use chronicle_core::{ExpandError, ScriptedModel, SeedContext};
use chrono::Utc;

fn seed_json() -> &'static str {
    r#"{
        "Characters": [
            {"Name": "Sir John Edwards", "Description": "King of Evermore."}
        ],
        "Locations": [
            {"Name": "The Dark Forest", "Description": "Oversees ancient laws and magic."}
        ]
    }"#
}

async fn load_seed() -> SeedContext {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_context.json");
    tokio::fs::write(&path, seed_json()).await.unwrap();
    SeedContext::load(&path).await.unwrap()
}

#[tokio::test]
async fn test_one_item_generated_per_category() {
    let seed = load_seed().await;
    let model = ScriptedModel::sequence(vec![
        r#"{"name": "Lady Ash", "description": "A wandering knight."}"#,
        r#"{"name": "The Glass Coast", "description": "A shattered shoreline."}"#,
    ]);

    let history = vec![HistoryRecord {
        id: 1,
        year: 1200,
        event: EventPayload::Text("Year: 1200 The Founding".to_string()),
        timestamp: Utc::now(),
    }];

    let items = expand_context(&model, "high fantasy", &seed, &timeline_digest(&history))
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Lady Ash");
    assert_eq!(items[1].name, "The Glass Coast");

    // Each request uses JSON response format and carries the category
    // examples plus the history digest.
    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert!(request.json_response);
    }
    let first_system = requests[0].system.as_deref().unwrap();
    assert!(first_system.contains("Characters:"));
    assert!(first_system.contains("Sir John Edwards"));
    assert!(first_system.contains("Year 1200"));
}

#[tokio::test]
async fn test_malformed_item_fails_without_retry() {
    let seed = load_seed().await;
    let model = ScriptedModel::repeating("not json");

    let result = expand_context(&model, "high fantasy", &seed, "").await;
    assert!(matches!(result, Err(ExpandError::InvalidItem(_))));
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_empty_seed_expands_to_nothing() {
    let model = ScriptedModel::sequence(Vec::<String>::new());
    let items = expand_context(&model, "noir", &SeedContext::default(), "")
        .await
        .unwrap();
    assert!(items.is_empty());
    assert_eq!(model.calls(), 0);
}
