//! Route definitions for the version snapshot ledger.
//!
//! ```text
//! GET    /cases/{case_id}/versions    list_versions
//! POST   /cases/{case_id}/versions    save_snapshot
//! DELETE /versions/{version_id}       delete_version
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/cases/{case_id}/versions",
            get(versions::list_versions).post(versions::save_snapshot),
        )
        .route("/versions/{version_id}", delete(versions::delete_version))
}
