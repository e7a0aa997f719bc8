//! Shared domain types for the Casewise annotation sync service.
//!
//! Holds the pieces every other crate agrees on: the error taxonomy, common
//! type aliases, and the broadcast envelope model for the realtime channel.

pub mod error;
pub mod sync;
pub mod types;
