//! Annotation model and DTOs.

use casewise_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `annotations` table: one marker on a case image.
///
/// Serializes in camelCase to match the platform client's wire format. The
/// `payload` is opaque geometry/label/style data the server never
/// interprets; `kind` is the client's tool tag (`rectangle`, `circle`,
/// `freehand`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: Uuid,
    pub case_id: String,
    pub user_id: Option<String>,
    pub kind: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new annotation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnotation {
    pub case_id: String,
    pub user_id: Option<String>,
    pub kind: String,
    #[serde(default = "empty_object")]
    pub payload: serde_json::Value,
}

/// DTO for a partial annotation update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnotation {
    pub kind: Option<String>,
    pub payload: Option<serde_json::Value>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}
