//! Handlers for the version snapshot ledger.
//!
//! Version history is pull-based: ledger mutations are not broadcast to the
//! case room, clients refresh the version list on demand.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use casewise_core::sync::validate_case_id;
use casewise_db::models::version::CreateVersionSnapshot;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /cases/{case_id}/versions
///
/// Freeze the supplied annotation payloads as the case's next numbered
/// snapshot.
pub async fn save_snapshot(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(input): Json<CreateVersionSnapshot>,
) -> AppResult<impl IntoResponse> {
    validate_case_id(&case_id).map_err(AppError::BadRequest)?;

    let snapshot = state.ledger.snapshot(&case_id, &input).await?;

    tracing::info!(
        case_id = %snapshot.case_id,
        version = snapshot.version,
        user_id = ?snapshot.user_id,
        "Version snapshot saved"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: snapshot })))
}

/// GET /cases/{case_id}/versions
///
/// List a case's snapshots, most recent version first.
pub async fn list_versions(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_case_id(&case_id).map_err(AppError::BadRequest)?;

    let versions = state.ledger.list(&case_id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// DELETE /versions/{version_id}
///
/// Delete a snapshot; later snapshots of the same case are renumbered so
/// the surviving versions stay dense.
pub async fn delete_version(
    State(state): State<AppState>,
    Path(version_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.ledger.delete(version_id).await?;

    tracing::info!(
        version_id = %version_id,
        case_id = %deleted.case_id,
        version = deleted.version,
        "Version snapshot deleted"
    );

    Ok(Json(DataResponse {
        data: serde_json::json!({ "deletedId": version_id, "version": deleted.version }),
    }))
}
