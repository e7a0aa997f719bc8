//! Version snapshot model and DTOs.

use casewise_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `annotation_versions` table: a saved, numbered copy of a
/// case's annotation set.
///
/// `version` is unique within a case and the surviving versions of a case
/// always form a dense `1..=N` sequence; `annotations` is the frozen JSON
/// array of annotation payloads as supplied at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    pub id: Uuid,
    pub case_id: String,
    pub user_id: Option<String>,
    pub version: i64,
    pub annotations: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for saving a new snapshot of a case's annotations.
///
/// The version number is not part of the DTO: it is assigned by the ledger.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionSnapshot {
    pub user_id: Option<String>,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}
