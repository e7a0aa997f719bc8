//! Route definitions.

pub mod annotations;
pub mod health;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(annotations::router())
        .merge(versions::router())
}
