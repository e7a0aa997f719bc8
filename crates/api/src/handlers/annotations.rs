//! Handlers for annotation CRUD: the mutation side of the sync gateway.
//!
//! Every successful mutation persists through the annotation store first and
//! then broadcasts the canonical envelope to the case's room. A persistence
//! failure surfaces as the HTTP error and suppresses the broadcast; a
//! broadcast problem never fails the mutation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use casewise_core::error::CoreError;
use casewise_core::sync::{validate_case_id, SyncEnvelope};
use casewise_db::models::annotation::{Annotation, CreateAnnotation, UpdateAnnotation};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Broadcast a canonical envelope carrying a persisted annotation document.
///
/// Best-effort: a serialization failure is logged and the mutation response
/// is unaffected (the write has already been persisted).
async fn broadcast_annotation(
    state: &AppState,
    annotation: &Annotation,
    build: impl FnOnce(serde_json::Value) -> SyncEnvelope,
) {
    match serde_json::to_value(annotation) {
        Ok(value) => {
            state
                .rooms
                .broadcast_event(&annotation.case_id, &build(value))
                .await;
        }
        Err(e) => {
            tracing::error!(
                annotation_id = %annotation.id,
                error = %e,
                "Failed to serialize annotation for broadcast"
            );
        }
    }
}

/// GET /cases/{case_id}/annotations
///
/// List a case's annotations in creation order. Read-only: no broadcast.
pub async fn list_annotations(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_case_id(&case_id).map_err(AppError::BadRequest)?;

    let annotations = state.store.list_by_case(&case_id).await?;
    Ok(Json(DataResponse { data: annotations }))
}

/// POST /annotations
///
/// Persist a new annotation and broadcast `{type:"add"}` to its case room.
pub async fn create_annotation(
    State(state): State<AppState>,
    Json(input): Json<CreateAnnotation>,
) -> AppResult<impl IntoResponse> {
    validate_case_id(&input.case_id).map_err(AppError::BadRequest)?;

    let annotation = state.store.insert(&input).await?;

    tracing::info!(
        annotation_id = %annotation.id,
        case_id = %annotation.case_id,
        kind = %annotation.kind,
        "Annotation created"
    );

    broadcast_annotation(&state, &annotation, |value| SyncEnvelope::Add {
        annotation: value,
    })
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: annotation })))
}

/// PUT /annotations/{id}
///
/// Apply a partial update and broadcast the refreshed canonical document.
pub async fn update_annotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateAnnotation>,
) -> AppResult<impl IntoResponse> {
    let annotation = state.store.update(id, &input).await?.ok_or(AppError::Core(
        CoreError::NotFound {
            entity: "Annotation",
            id,
        },
    ))?;

    tracing::info!(
        annotation_id = %annotation.id,
        case_id = %annotation.case_id,
        "Annotation updated"
    );

    broadcast_annotation(&state, &annotation, |value| SyncEnvelope::Update {
        annotation: value,
    })
    .await;

    Ok(Json(DataResponse { data: annotation }))
}

/// DELETE /annotations/{id}
///
/// Remove an annotation and broadcast `{type:"delete"}` to its case room.
pub async fn delete_annotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    // The case id is needed for the broadcast, so resolve the document
    // before removing it.
    let annotation = state.store.find_by_id(id).await?.ok_or(AppError::Core(
        CoreError::NotFound {
            entity: "Annotation",
            id,
        },
    ))?;

    if !state.store.delete(id).await? {
        // Lost a race with a concurrent delete.
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Annotation",
            id,
        }));
    }

    tracing::info!(annotation_id = %id, case_id = %annotation.case_id, "Annotation deleted");

    state
        .rooms
        .broadcast_event(
            &annotation.case_id,
            &SyncEnvelope::Delete { annotation_id: id },
        )
        .await;

    Ok(Json(DataResponse {
        data: serde_json::json!({ "deletedId": id }),
    }))
}
