//! Per-connection session handling for the realtime annotation channel.
//!
//! Each client connects to `/ws/annotations/{case_id}` and is bound to that
//! case for the connection's lifetime. The session layer relays well-formed
//! JSON objects verbatim to the case room without interpreting them, so
//! clients can exchange ephemeral events (live cursors, geometry in
//! progress) alongside the canonical envelopes emitted by the REST gateway
//! handlers.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use uuid::Uuid;

use casewise_core::sync::{PresenceAction, SyncEnvelope};

use crate::state::AppState;
use crate::ws::rooms::RoomRegistry;

/// Query parameters accepted at connect time.
#[derive(Debug, serde::Deserialize)]
pub struct SessionParams {
    /// Caller-supplied identity, used only for presence envelopes.
    pub user_id: Option<String>,
}

/// HTTP handler that upgrades the connection and binds it to a case room.
pub async fn annotations_ws(
    ws: WebSocketUpgrade,
    Path(case_id): Path<String>,
    Query(params): Query<SessionParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.rooms, case_id, params.user_id))
}

/// Manage a single session after upgrade.
///
/// The join presence envelope goes out before the session is registered, so
/// existing members hear about the newcomer but the newcomer never receives
/// its own join. Symmetrically, the leave envelope goes out after
/// deregistration, excluding the leaver. Termination is never retried; a
/// reconnecting client becomes a new session.
async fn handle_socket(
    socket: WebSocket,
    rooms: Arc<RoomRegistry>,
    case_id: String,
    user_id: Option<String>,
) {
    let session_id = Uuid::new_v4();
    tracing::info!(%session_id, case_id = %case_id, user_id = ?user_id, "Session connected");

    rooms
        .broadcast_event(
            &case_id,
            &SyncEnvelope::Presence {
                action: PresenceAction::Join,
                user_id: user_id.clone(),
            },
        )
        .await;

    let mut rx = rooms.join(&case_id, session_id, user_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Writer task: forward queued messages to the WebSocket sink.
    let writer_session_id = session_id;
    let write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(session_id = %writer_session_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Read loop: relay well-formed JSON objects to the room, verbatim.
    // Anything else is dropped without terminating the connection.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(value) if value.is_object() => {
                        rooms.broadcast(&case_id, Message::Text(text)).await;
                    }
                    _ => {
                        tracing::debug!(%session_id, "Discarding malformed inbound message");
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(%session_id, "Pong received");
            }
            // Binary and Ping frames carry no realtime events.
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%session_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    rooms.leave(&case_id, session_id).await;
    write_task.abort();

    rooms
        .broadcast_event(
            &case_id,
            &SyncEnvelope::Presence {
                action: PresenceAction::Leave,
                user_id,
            },
        )
        .await;

    tracing::info!(%session_id, case_id = %case_id, "Session disconnected");
}
