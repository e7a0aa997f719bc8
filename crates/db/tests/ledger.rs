//! Integration tests for the version ledger.
//!
//! Exercises the ledger over the in-memory store: dense numbering across
//! arbitrary snapshot/delete sequences, per-case scoping, and uniqueness
//! under concurrent snapshot requests.

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;

use casewise_db::models::version::CreateVersionSnapshot;
use casewise_db::{AnnotationStore, LedgerError, MemoryStore, VersionLedger};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_ledger() -> VersionLedger {
    let store: Arc<dyn AnnotationStore> = Arc::new(MemoryStore::new());
    VersionLedger::new(store)
}

/// Snapshot input whose payload carries a marker so tests can track which
/// snapshot ended up under which number.
fn snapshot_input(marker: &str) -> CreateVersionSnapshot {
    CreateVersionSnapshot {
        user_id: Some("u1".into()),
        annotations: vec![json!({ "marker": marker })],
    }
}

fn marker_of(snapshot: &casewise_db::models::version::VersionSnapshot) -> String {
    snapshot.annotations[0]["marker"]
        .as_str()
        .expect("snapshot should carry a marker")
        .to_string()
}

// ---------------------------------------------------------------------------
// Test: numbering starts at 1 and grows densely
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_snapshot_gets_version_one() {
    let ledger = new_ledger();

    let snapshot = ledger.snapshot("c1", &snapshot_input("a")).await.unwrap();

    assert_eq!(snapshot.version, 1);
}

#[tokio::test]
async fn snapshots_number_sequentially() {
    let ledger = new_ledger();

    for expected in 1..=4 {
        let snapshot = ledger.snapshot("c1", &snapshot_input("a")).await.unwrap();
        assert_eq!(snapshot.version, expected);
    }
}

#[tokio::test]
async fn numbering_is_scoped_per_case() {
    let ledger = new_ledger();

    ledger.snapshot("c1", &snapshot_input("a")).await.unwrap();
    ledger.snapshot("c1", &snapshot_input("b")).await.unwrap();
    let other = ledger.snapshot("c2", &snapshot_input("c")).await.unwrap();

    // c2 starts at 1 regardless of c1's history.
    assert_eq!(other.version, 1);
}

// ---------------------------------------------------------------------------
// Test: list returns most recent version first
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_most_recent_first() {
    let ledger = new_ledger();

    ledger.snapshot("c1", &snapshot_input("a")).await.unwrap();
    ledger.snapshot("c1", &snapshot_input("b")).await.unwrap();
    ledger.snapshot("c1", &snapshot_input("c")).await.unwrap();

    let versions = ledger.list("c1").await.unwrap();
    let numbers: Vec<i64> = versions.iter().map(|v| v.version).collect();

    assert_eq!(numbers, vec![3, 2, 1]);
}

// ---------------------------------------------------------------------------
// Test: delete of an unknown snapshot is NotFound
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_unknown_version_is_not_found() {
    let ledger = new_ledger();

    let result = ledger.delete(uuid::Uuid::new_v4()).await;

    assert_matches!(result, Err(LedgerError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// Test: delete renumbers later snapshots, preserving relative order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_renumbers_later_versions_gap_free() {
    let ledger = new_ledger();

    ledger.snapshot("c1", &snapshot_input("first")).await.unwrap();
    let second = ledger.snapshot("c1", &snapshot_input("second")).await.unwrap();
    ledger.snapshot("c1", &snapshot_input("third")).await.unwrap();

    let deleted = ledger.delete(second.id).await.unwrap();
    assert_eq!(deleted.version, 2);

    let versions = ledger.list("c1").await.unwrap();
    assert_eq!(versions.len(), 2);

    // Survivors are exactly {1, 2}; the former v3 is now reported as v2.
    assert_eq!(versions[0].version, 2);
    assert_eq!(marker_of(&versions[0]), "third");
    assert_eq!(versions[1].version, 1);
    assert_eq!(marker_of(&versions[1]), "first");
}

#[tokio::test]
async fn repeated_deletes_keep_numbering_dense() {
    let ledger = new_ledger();

    let mut ids = Vec::new();
    for marker in ["a", "b", "c", "d", "e"] {
        ids.push(ledger.snapshot("c1", &snapshot_input(marker)).await.unwrap().id);
    }

    // Delete the head, the (renumbered) middle, and the tail.
    ledger.delete(ids[0]).await.unwrap();
    ledger.delete(ids[2]).await.unwrap();
    ledger.delete(ids[4]).await.unwrap();

    let versions = ledger.list("c1").await.unwrap();
    let numbers: Vec<i64> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![2, 1]);

    // Relative creation order among survivors is unchanged: b before d.
    assert_eq!(marker_of(&versions[0]), "d");
    assert_eq!(marker_of(&versions[1]), "b");
}

#[tokio::test]
async fn delete_in_one_case_leaves_other_cases_alone() {
    let ledger = new_ledger();

    ledger.snapshot("c1", &snapshot_input("a")).await.unwrap();
    let doomed = ledger.snapshot("c1", &snapshot_input("b")).await.unwrap();
    ledger.snapshot("c2", &snapshot_input("x")).await.unwrap();
    ledger.snapshot("c2", &snapshot_input("y")).await.unwrap();

    ledger.delete(doomed.id).await.unwrap();

    let other = ledger.list("c2").await.unwrap();
    let numbers: Vec<i64> = other.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![2, 1]);
}

// ---------------------------------------------------------------------------
// Test: concurrent snapshots never duplicate or skip a number
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_snapshots_get_distinct_contiguous_versions() {
    let ledger = Arc::new(new_ledger());

    let mut handles = Vec::new();
    for i in 0..8 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger
                .snapshot("c1", &snapshot_input(&format!("task-{i}")))
                .await
                .unwrap()
                .version
        }));
    }

    let mut versions = Vec::new();
    for handle in handles {
        versions.push(handle.await.unwrap());
    }
    versions.sort_unstable();

    assert_eq!(versions, (1..=8).collect::<Vec<i64>>());
}

// ---------------------------------------------------------------------------
// Test: snapshot freezes the supplied payloads verbatim
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snapshot_freezes_annotation_payloads() {
    let ledger = new_ledger();

    let input = CreateVersionSnapshot {
        user_id: None,
        annotations: vec![json!({"kind": "circle", "x": 3}), json!({"kind": "text"})],
    };
    let snapshot = ledger.snapshot("c1", &input).await.unwrap();

    assert_eq!(snapshot.user_id, None);
    assert_eq!(
        snapshot.annotations,
        json!([{"kind": "circle", "x": 3}, {"kind": "text"}])
    );
}
