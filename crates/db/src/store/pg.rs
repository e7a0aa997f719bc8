//! PostgreSQL-backed annotation store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::annotation::{Annotation, CreateAnnotation, UpdateAnnotation};
use crate::models::version::{CreateVersionSnapshot, VersionSnapshot};
use crate::store::{AnnotationStore, StoreError};

/// Column list for annotations queries.
const ANNOTATION_COLUMNS: &str = "id, case_id, user_id, kind, payload, created_at, updated_at";

/// Column list for annotation_versions queries.
const VERSION_COLUMNS: &str = "id, case_id, user_id, version, annotations, created_at";

/// Production [`AnnotationStore`] over a PostgreSQL pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnotationStore for PgStore {
    async fn insert(&self, input: &CreateAnnotation) -> Result<Annotation, StoreError> {
        let query = format!(
            "INSERT INTO annotations (case_id, user_id, kind, payload)
             VALUES ($1, $2, $3, $4)
             RETURNING {ANNOTATION_COLUMNS}"
        );
        let annotation = sqlx::query_as::<_, Annotation>(&query)
            .bind(&input.case_id)
            .bind(&input.user_id)
            .bind(&input.kind)
            .bind(&input.payload)
            .fetch_one(&self.pool)
            .await?;
        Ok(annotation)
    }

    async fn update(
        &self,
        id: Uuid,
        input: &UpdateAnnotation,
    ) -> Result<Option<Annotation>, StoreError> {
        let query = format!(
            "UPDATE annotations SET
                kind = COALESCE($1, kind),
                payload = COALESCE($2, payload),
                updated_at = now()
             WHERE id = $3
             RETURNING {ANNOTATION_COLUMNS}"
        );
        let annotation = sqlx::query_as::<_, Annotation>(&query)
            .bind(&input.kind)
            .bind(&input.payload)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(annotation)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_case(&self, case_id: &str) -> Result<Vec<Annotation>, StoreError> {
        let query = format!(
            "SELECT {ANNOTATION_COLUMNS} FROM annotations
             WHERE case_id = $1
             ORDER BY created_at ASC"
        );
        let annotations = sqlx::query_as::<_, Annotation>(&query)
            .bind(case_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(annotations)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Annotation>, StoreError> {
        let query = format!("SELECT {ANNOTATION_COLUMNS} FROM annotations WHERE id = $1");
        let annotation = sqlx::query_as::<_, Annotation>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(annotation)
    }

    async fn max_version(&self, case_id: &str) -> Result<i64, StoreError> {
        let max: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(version), 0) FROM annotation_versions WHERE case_id = $1",
        )
        .bind(case_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(max)
    }

    async fn insert_version(
        &self,
        case_id: &str,
        input: &CreateVersionSnapshot,
        version: i64,
    ) -> Result<VersionSnapshot, StoreError> {
        let query = format!(
            "INSERT INTO annotation_versions (case_id, user_id, version, annotations)
             VALUES ($1, $2, $3, $4)
             RETURNING {VERSION_COLUMNS}"
        );
        let snapshot = sqlx::query_as::<_, VersionSnapshot>(&query)
            .bind(case_id)
            .bind(&input.user_id)
            .bind(version)
            .bind(serde_json::Value::Array(input.annotations.clone()))
            .fetch_one(&self.pool)
            .await?;
        Ok(snapshot)
    }

    async fn list_versions(&self, case_id: &str) -> Result<Vec<VersionSnapshot>, StoreError> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM annotation_versions
             WHERE case_id = $1
             ORDER BY version DESC"
        );
        let snapshots = sqlx::query_as::<_, VersionSnapshot>(&query)
            .bind(case_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(snapshots)
    }

    async fn find_version(&self, id: Uuid) -> Result<Option<VersionSnapshot>, StoreError> {
        let query = format!("SELECT {VERSION_COLUMNS} FROM annotation_versions WHERE id = $1");
        let snapshot = sqlx::query_as::<_, VersionSnapshot>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(snapshot)
    }

    async fn delete_version(&self, id: Uuid) -> Result<Option<VersionSnapshot>, StoreError> {
        let query = format!(
            "DELETE FROM annotation_versions WHERE id = $1
             RETURNING {VERSION_COLUMNS}"
        );
        let snapshot = sqlx::query_as::<_, VersionSnapshot>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(snapshot)
    }

    async fn versions_after(
        &self,
        case_id: &str,
        version: i64,
    ) -> Result<Vec<VersionSnapshot>, StoreError> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM annotation_versions
             WHERE case_id = $1 AND version > $2
             ORDER BY version ASC"
        );
        let snapshots = sqlx::query_as::<_, VersionSnapshot>(&query)
            .bind(case_id)
            .bind(version)
            .fetch_all(&self.pool)
            .await?;
        Ok(snapshots)
    }

    async fn set_version_number(&self, id: Uuid, version: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE annotation_versions SET version = $1 WHERE id = $2")
            .bind(version)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
