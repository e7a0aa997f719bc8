//! Row models and DTOs for the sync service's two persisted document kinds.

pub mod annotation;
pub mod version;
