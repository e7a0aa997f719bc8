use std::sync::Arc;

use casewise_db::{AnnotationStore, VersionLedger};

use crate::config::ServerConfig;
use crate::ws::RoomRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The registry,
/// ledger, and store are constructed once in `main` (or a test harness) and
/// injected here rather than reached through globals, so each test gets its
/// own isolated instances.
#[derive(Clone)]
pub struct AppState {
    /// Annotation document store.
    pub store: Arc<dyn AnnotationStore>,
    /// Version snapshot ledger.
    pub ledger: Arc<VersionLedger>,
    /// Per-case WebSocket room registry.
    pub rooms: Arc<RoomRegistry>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
