//! Shared helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::Request;

use casewise_api::config::ServerConfig;
use casewise_api::router::build_app_router;
use casewise_api::state::AppState;
use casewise_api::ws::RoomRegistry;
use casewise_db::{AnnotationStore, MemoryStore, VersionLedger};

/// Build an isolated [`AppState`] over the in-memory store.
pub fn test_state() -> AppState {
    let store: Arc<dyn AnnotationStore> = Arc::new(MemoryStore::new());
    let ledger = Arc::new(VersionLedger::new(Arc::clone(&store)));

    AppState {
        store,
        ledger,
        rooms: Arc::new(RoomRegistry::new()),
        config: Arc::new(test_config()),
    }
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 5,
    }
}

/// Build the full application router (routes + middleware) over a state.
pub fn test_app(state: &AppState) -> axum::Router {
    build_app_router(state.clone(), &state.config)
}

/// Build a JSON request with the given method, URI, and body.
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

/// Build an empty-bodied request (GET/DELETE).
pub fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

/// Collect a response body into JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
