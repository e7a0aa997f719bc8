//! Version ledger: numbered snapshots of a case's annotation set.
//!
//! The surviving version numbers of a case always form a dense `1..=N`
//! sequence, ordered by creation time. Both the read-then-insert on
//! snapshot and the delete-then-renumber are serialized per case, so
//! concurrent calls can never assign duplicate or gapped numbers; locks for
//! unrelated cases never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::version::{CreateVersionSnapshot, VersionSnapshot};
use crate::store::{AnnotationStore, StoreError};

/// Errors surfaced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Version not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Append-then-renumber snapshot ledger over an [`AnnotationStore`].
///
/// Construct one instance in `main` and share it via `Arc`; the per-case
/// lock map is only effective within a single instance.
pub struct VersionLedger {
    store: Arc<dyn AnnotationStore>,
    case_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl VersionLedger {
    pub fn new(store: Arc<dyn AnnotationStore>) -> Self {
        Self {
            store,
            case_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The serialization point for one case's version-number writes.
    async fn lock_for(&self, case_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.case_locks.lock().await;
        Arc::clone(locks.entry(case_id.to_string()).or_default())
    }

    /// Assign the next version number for the case and insert a snapshot.
    pub async fn snapshot(
        &self,
        case_id: &str,
        input: &CreateVersionSnapshot,
    ) -> Result<VersionSnapshot, LedgerError> {
        let lock = self.lock_for(case_id).await;
        let _guard = lock.lock().await;

        let next = self.store.max_version(case_id).await? + 1;
        let snapshot = self.store.insert_version(case_id, input, next).await?;

        tracing::debug!(case_id, version = snapshot.version, "Snapshot inserted");
        Ok(snapshot)
    }

    /// All snapshots for a case, most recent version first.
    pub async fn list(&self, case_id: &str) -> Result<Vec<VersionSnapshot>, LedgerError> {
        Ok(self.store.list_versions(case_id).await?)
    }

    /// Delete a snapshot and close the numbering gap it leaves behind.
    ///
    /// Later snapshots of the same case are renumbered one by one in
    /// ascending original order, each decremented into the slot just freed,
    /// so no two snapshots ever share a number, even transiently. Returns
    /// the deleted snapshot.
    pub async fn delete(&self, version_id: Uuid) -> Result<VersionSnapshot, LedgerError> {
        // Resolve the case first; the critical section is scoped per case.
        let found = self
            .store
            .find_version(version_id)
            .await?
            .ok_or(LedgerError::NotFound(version_id))?;

        let lock = self.lock_for(&found.case_id).await;
        let _guard = lock.lock().await;

        // Re-check under the lock: a concurrent delete may have won.
        let deleted = self
            .store
            .delete_version(version_id)
            .await?
            .ok_or(LedgerError::NotFound(version_id))?;

        let later = self
            .store
            .versions_after(&deleted.case_id, deleted.version)
            .await?;
        let renumbered = later.len();
        for snapshot in later {
            self.store
                .set_version_number(snapshot.id, snapshot.version - 1)
                .await?;
        }

        tracing::debug!(
            case_id = %deleted.case_id,
            version = deleted.version,
            renumbered,
            "Snapshot deleted and ledger renumbered"
        );
        Ok(deleted)
    }
}
