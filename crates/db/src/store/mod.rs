//! The annotation store contract and its implementations.
//!
//! The gateway and the version ledger treat the document store as a
//! collaborator behind this trait; everything they need is expressed as one
//! of these operations. [`PgStore`] is the production implementation;
//! [`MemoryStore`] backs the test suite and database-less development.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::annotation::{Annotation, CreateAnnotation, UpdateAnnotation};
use crate::models::version::{CreateVersionSnapshot, VersionSnapshot};

/// Errors surfaced by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// CRUD over annotation documents and version snapshots, keyed by case.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Insert a new annotation, stamping both timestamps to now.
    async fn insert(&self, input: &CreateAnnotation) -> Result<Annotation, StoreError>;

    /// Apply a partial update and return the refreshed canonical document,
    /// or `None` if the id is unknown. Re-stamps `updated_at`.
    async fn update(
        &self,
        id: Uuid,
        input: &UpdateAnnotation,
    ) -> Result<Option<Annotation>, StoreError>;

    /// Delete an annotation. Returns `true` if a document was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// All annotations for a case, in creation order.
    async fn list_by_case(&self, case_id: &str) -> Result<Vec<Annotation>, StoreError>;

    /// Look up a single annotation.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Annotation>, StoreError>;

    /// Highest assigned version number for a case, 0 if it has none.
    async fn max_version(&self, case_id: &str) -> Result<i64, StoreError>;

    /// Insert a snapshot under an already-assigned version number.
    ///
    /// Callers are responsible for serializing number assignment per case
    /// (see [`crate::ledger::VersionLedger`]).
    async fn insert_version(
        &self,
        case_id: &str,
        input: &CreateVersionSnapshot,
        version: i64,
    ) -> Result<VersionSnapshot, StoreError>;

    /// All snapshots for a case, most recent version first.
    async fn list_versions(&self, case_id: &str) -> Result<Vec<VersionSnapshot>, StoreError>;

    /// Look up a single snapshot.
    async fn find_version(&self, id: Uuid) -> Result<Option<VersionSnapshot>, StoreError>;

    /// Remove a snapshot, returning the removed document if it existed.
    async fn delete_version(&self, id: Uuid) -> Result<Option<VersionSnapshot>, StoreError>;

    /// Snapshots of a case with a version strictly greater than `version`,
    /// ordered by version ascending.
    async fn versions_after(
        &self,
        case_id: &str,
        version: i64,
    ) -> Result<Vec<VersionSnapshot>, StoreError>;

    /// Reassign a snapshot's version number.
    async fn set_version_number(&self, id: Uuid, version: i64) -> Result<(), StoreError>;
}
