use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use casewise_core::sync::SyncEnvelope;
use casewise_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// One live session registered in a case room.
pub struct RoomMember {
    /// Identity supplied at connect time; `None` for anonymous viewers.
    pub user_id: Option<String>,
    /// Channel sender for outbound messages to this session.
    pub sender: WsSender,
    /// When the session joined the room.
    pub joined_at: Timestamp,
}

/// Tracks, per case id, the set of live sessions, and fans messages out to
/// them.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`,
/// constructed once, and handed to the gateway handlers and session loop.
/// A room exists only while it has members: the entry is created on first
/// join and removed when the last session leaves, so an idle registry holds
/// no state.
///
/// Delivery is fire-and-forget, at-most-once: the member set is snapshotted
/// under the read lock, the lock is released before any send, and a failed
/// send never blocks siblings or surfaces to the broadcaster.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, HashMap<Uuid, RoomMember>>>,
}

impl RoomRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Register a session under a case, creating the room if needed.
    ///
    /// Returns the receiver half of the session's message channel so the
    /// caller can forward queued messages to the WebSocket sink. Joining
    /// again with the same session id replaces the previous registration
    /// (the stale sender is dropped).
    pub async fn join(
        &self,
        case_id: &str,
        session_id: Uuid,
        user_id: Option<String>,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let member = RoomMember {
            user_id,
            sender: tx,
            joined_at: chrono::Utc::now(),
        };
        self.rooms
            .write()
            .await
            .entry(case_id.to_string())
            .or_default()
            .insert(session_id, member);
        rx
    }

    /// Remove a session from a case room.
    ///
    /// Removes the room entry itself when the set becomes empty. Unknown
    /// case or session ids are a no-op.
    pub async fn leave(&self, case_id: &str, session_id: Uuid) {
        let mut rooms = self.rooms.write().await;
        if let Some(members) = rooms.get_mut(case_id) {
            members.remove(&session_id);
            if members.is_empty() {
                rooms.remove(case_id);
            }
        }
    }

    /// Deliver a message to every session currently in a case room.
    ///
    /// Membership is snapshotted at call time; sessions joining afterwards
    /// are not guaranteed delivery. Sends to closed channels are silently
    /// skipped (the dead session is cleaned up by its own read loop).
    pub async fn broadcast(&self, case_id: &str, message: Message) {
        let senders: Vec<WsSender> = {
            let rooms = self.rooms.read().await;
            match rooms.get(case_id) {
                Some(members) => members.values().map(|m| m.sender.clone()).collect(),
                None => return,
            }
        };

        for sender in senders {
            let _ = sender.send(message.clone());
        }
    }

    /// Serialize a canonical envelope once and broadcast it as a text frame.
    pub async fn broadcast_event(&self, case_id: &str, event: &SyncEnvelope) {
        match serde_json::to_string(event) {
            Ok(text) => self.broadcast(case_id, Message::Text(text.into())).await,
            Err(e) => {
                tracing::error!(case_id, error = %e, "Failed to serialize broadcast envelope");
            }
        }
    }

    /// Number of live sessions in one case room.
    pub async fn room_size(&self, case_id: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(case_id)
            .map_or(0, |members| members.len())
    }

    /// Whether a room entry currently exists for a case.
    pub async fn has_room(&self, case_id: &str) -> bool {
        self.rooms.read().await.contains_key(case_id)
    }

    /// Total number of live sessions across all rooms.
    pub async fn connection_count(&self) -> usize {
        self.rooms
            .read()
            .await
            .values()
            .map(|members| members.len())
            .sum()
    }

    /// Send a Ping frame to every session in every room.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let rooms = self.rooms.read().await;
        for members in rooms.values() {
            for member in members.values() {
                let _ = member.sender.send(Message::Ping(Bytes::new()));
            }
        }
    }

    /// Send a Close frame to every session, then clear all rooms.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut rooms = self.rooms.write().await;
        let count: usize = rooms.values().map(|members| members.len()).sum();
        for members in rooms.values() {
            for member in members.values() {
                let _ = member.sender.send(Message::Close(None));
            }
        }
        rooms.clear();
        tracing::info!(count, "Closed all WebSocket sessions");
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
