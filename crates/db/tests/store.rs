//! Integration tests for the in-memory annotation store.
//!
//! The memory store must mirror the PostgreSQL store's observable
//! semantics: store-assigned ids, timestamp stamping, COALESCE-style
//! partial updates, and creation-ordered listings.

use serde_json::json;
use uuid::Uuid;

use casewise_db::models::annotation::{CreateAnnotation, UpdateAnnotation};
use casewise_db::{AnnotationStore, MemoryStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_annotation(case_id: &str, kind: &str) -> CreateAnnotation {
    CreateAnnotation {
        case_id: case_id.to_string(),
        user_id: Some("u1".into()),
        kind: kind.to_string(),
        payload: json!({"x": 10, "y": 20}),
    }
}

// ---------------------------------------------------------------------------
// Test: insert assigns identity and stamps both timestamps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn insert_assigns_id_and_timestamps() {
    let store = MemoryStore::new();

    let annotation = store.insert(&new_annotation("c1", "circle")).await.unwrap();

    assert_eq!(annotation.case_id, "c1");
    assert_eq!(annotation.kind, "circle");
    assert_eq!(annotation.created_at, annotation.updated_at);

    let found = store.find_by_id(annotation.id).await.unwrap();
    assert_eq!(found, Some(annotation));
}

// ---------------------------------------------------------------------------
// Test: update applies only the supplied fields and re-stamps updated_at
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_is_partial_and_refreshes_updated_at() {
    let store = MemoryStore::new();
    let created = store.insert(&new_annotation("c1", "circle")).await.unwrap();

    let update = UpdateAnnotation {
        kind: None,
        payload: Some(json!({"x": 99})),
    };
    let updated = store.update(created.id, &update).await.unwrap().unwrap();

    assert_eq!(updated.kind, "circle");
    assert_eq!(updated.payload, json!({"x": 99}));
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_unknown_id_returns_none() {
    let store = MemoryStore::new();

    let result = store
        .update(Uuid::new_v4(), &UpdateAnnotation::default())
        .await
        .unwrap();

    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: delete reports whether a document was matched
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_reports_matched() {
    let store = MemoryStore::new();
    let created = store.insert(&new_annotation("c1", "circle")).await.unwrap();

    assert!(store.delete(created.id).await.unwrap());
    assert!(!store.delete(created.id).await.unwrap());
    assert!(store.find_by_id(created.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: listing filters by case in creation order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_by_case_filters_and_preserves_creation_order() {
    let store = MemoryStore::new();

    store.insert(&new_annotation("c1", "circle")).await.unwrap();
    store.insert(&new_annotation("c2", "text")).await.unwrap();
    store.insert(&new_annotation("c1", "polygon")).await.unwrap();

    let kinds: Vec<String> = store
        .list_by_case("c1")
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.kind)
        .collect();

    assert_eq!(kinds, vec!["circle", "polygon"]);
    assert!(store.list_by_case("c3").await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: version operations used by the ledger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn version_operations_round_trip() {
    let store = MemoryStore::new();
    let input = casewise_db::models::version::CreateVersionSnapshot {
        user_id: Some("u1".into()),
        annotations: vec![json!({"kind": "circle"})],
    };

    assert_eq!(store.max_version("c1").await.unwrap(), 0);

    let v1 = store.insert_version("c1", &input, 1).await.unwrap();
    let v2 = store.insert_version("c1", &input, 2).await.unwrap();
    let v3 = store.insert_version("c1", &input, 3).await.unwrap();
    assert_eq!(store.max_version("c1").await.unwrap(), 3);

    let after: Vec<i64> = store
        .versions_after("c1", 1)
        .await
        .unwrap()
        .iter()
        .map(|v| v.version)
        .collect();
    assert_eq!(after, vec![2, 3]);

    store.set_version_number(v3.id, 99).await.unwrap();
    assert_eq!(store.max_version("c1").await.unwrap(), 99);

    let deleted = store.delete_version(v2.id).await.unwrap();
    assert_eq!(deleted.map(|v| v.version), Some(2));
    assert!(store.delete_version(v2.id).await.unwrap().is_none());
    assert!(store.find_version(v1.id).await.unwrap().is_some());
}
