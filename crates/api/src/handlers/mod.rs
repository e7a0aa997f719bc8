//! HTTP handlers: the REST side of the sync gateway.

pub mod annotations;
pub mod versions;
