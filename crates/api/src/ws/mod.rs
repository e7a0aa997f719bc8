//! WebSocket infrastructure for the realtime annotation channel.
//!
//! Provides the per-case room registry, the session upgrade handler, and
//! heartbeat monitoring.

mod heartbeat;
pub mod rooms;
mod session;

pub use heartbeat::start_heartbeat;
pub use rooms::RoomRegistry;
pub use session::annotations_ws;
