//! Broadcast envelope model for the realtime annotation channel.
//!
//! Every message the gateway itself emits to a case room is one of these
//! envelopes, tagged by its `type` field on the wire. Clients may also relay
//! arbitrary JSON objects through the session layer (live cursors, geometry
//! in progress); those are opaque to the server and must not reuse the
//! `type` values defined here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Presence lifecycle actions carried by `{"type":"presence"}` envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceAction {
    Join,
    Leave,
}

/// A canonical broadcast message describing a change to a case's state.
///
/// Annotation documents are carried as raw JSON: the gateway serializes the
/// store's canonical document once and the registry relays it untouched.
/// Delivery is at-most-once with no replay; a client that misses an envelope
/// reconciles by re-fetching the case's annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyncEnvelope {
    /// A new annotation was persisted.
    Add { annotation: serde_json::Value },

    /// An existing annotation was updated; carries the refreshed document.
    Update { annotation: serde_json::Value },

    /// An annotation was removed.
    Delete {
        #[serde(rename = "annotationId")]
        annotation_id: Uuid,
    },

    /// A session joined or left the case room. Never persisted.
    Presence {
        action: PresenceAction,
        #[serde(rename = "userId")]
        user_id: Option<String>,
    },
}

/// Validate a case identifier supplied in a path or payload.
///
/// Case ids are opaque strings owned by the platform's case management; the
/// sync service only rejects ids that cannot key a room.
pub fn validate_case_id(case_id: &str) -> Result<(), String> {
    if case_id.trim().is_empty() {
        return Err("case id must not be empty".into());
    }
    if case_id.len() > 128 {
        return Err("case id must be at most 128 characters".into());
    }
    Ok(())
}
