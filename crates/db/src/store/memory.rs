//! In-memory annotation store.
//!
//! Backs the test suites and database-less local development. Mirrors the
//! semantics of [`super::PgStore`]: store-assigned ids, timestamp stamping,
//! creation-ordered listings.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::annotation::{Annotation, CreateAnnotation, UpdateAnnotation};
use crate::models::version::{CreateVersionSnapshot, VersionSnapshot};
use crate::store::{AnnotationStore, StoreError};

#[derive(Default)]
struct Inner {
    annotations: HashMap<Uuid, (u64, Annotation)>,
    versions: HashMap<Uuid, VersionSnapshot>,
    // Monotonic insertion sequence; orders listings when timestamps tie.
    seq: u64,
}

/// [`AnnotationStore`] over process-local hash maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnnotationStore for MemoryStore {
    async fn insert(&self, input: &CreateAnnotation) -> Result<Annotation, StoreError> {
        let now = chrono::Utc::now();
        let annotation = Annotation {
            id: Uuid::new_v4(),
            case_id: input.case_id.clone(),
            user_id: input.user_id.clone(),
            kind: input.kind.clone(),
            payload: input.payload.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        inner.seq += 1;
        let seq = inner.seq;
        inner.annotations.insert(annotation.id, (seq, annotation.clone()));
        Ok(annotation)
    }

    async fn update(
        &self,
        id: Uuid,
        input: &UpdateAnnotation,
    ) -> Result<Option<Annotation>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some((_, annotation)) = inner.annotations.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(kind) = &input.kind {
            annotation.kind = kind.clone();
        }
        if let Some(payload) = &input.payload {
            annotation.payload = payload.clone();
        }
        annotation.updated_at = chrono::Utc::now();
        Ok(Some(annotation.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.annotations.remove(&id).is_some())
    }

    async fn list_by_case(&self, case_id: &str) -> Result<Vec<Annotation>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner
            .annotations
            .values()
            .filter(|(_, a)| a.case_id == case_id)
            .cloned()
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, a)| a).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Annotation>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.annotations.get(&id).map(|(_, a)| a.clone()))
    }

    async fn max_version(&self, case_id: &str) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .versions
            .values()
            .filter(|v| v.case_id == case_id)
            .map(|v| v.version)
            .max()
            .unwrap_or(0))
    }

    async fn insert_version(
        &self,
        case_id: &str,
        input: &CreateVersionSnapshot,
        version: i64,
    ) -> Result<VersionSnapshot, StoreError> {
        let snapshot = VersionSnapshot {
            id: Uuid::new_v4(),
            case_id: case_id.to_string(),
            user_id: input.user_id.clone(),
            version,
            annotations: serde_json::Value::Array(input.annotations.clone()),
            created_at: chrono::Utc::now(),
        };

        self.inner
            .write()
            .await
            .versions
            .insert(snapshot.id, snapshot.clone());
        Ok(snapshot)
    }

    async fn list_versions(&self, case_id: &str) -> Result<Vec<VersionSnapshot>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner
            .versions
            .values()
            .filter(|v| v.case_id == case_id)
            .cloned()
            .collect();
        rows.sort_by_key(|v| std::cmp::Reverse(v.version));
        Ok(rows)
    }

    async fn find_version(&self, id: Uuid) -> Result<Option<VersionSnapshot>, StoreError> {
        Ok(self.inner.read().await.versions.get(&id).cloned())
    }

    async fn delete_version(&self, id: Uuid) -> Result<Option<VersionSnapshot>, StoreError> {
        Ok(self.inner.write().await.versions.remove(&id))
    }

    async fn versions_after(
        &self,
        case_id: &str,
        version: i64,
    ) -> Result<Vec<VersionSnapshot>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner
            .versions
            .values()
            .filter(|v| v.case_id == case_id && v.version > version)
            .cloned()
            .collect();
        rows.sort_by_key(|v| v.version);
        Ok(rows)
    }

    async fn set_version_number(&self, id: Uuid, version: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(snapshot) = inner.versions.get_mut(&id) {
            snapshot.version = version;
        }
        Ok(())
    }
}
