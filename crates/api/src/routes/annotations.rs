//! Route definitions for annotation CRUD.
//!
//! ```text
//! GET    /cases/{case_id}/annotations    list_annotations
//! POST   /annotations                    create_annotation
//! PUT    /annotations/{id}               update_annotation
//! DELETE /annotations/{id}               delete_annotation
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::annotations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/cases/{case_id}/annotations",
            get(annotations::list_annotations),
        )
        .route("/annotations", post(annotations::create_annotation))
        .route(
            "/annotations/{id}",
            put(annotations::update_annotation).delete(annotations::delete_annotation),
        )
}
