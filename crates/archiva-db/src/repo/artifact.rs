//! Artifact record repository.

use archiva_core::{ArtifactRecord, ArtifactReference, RecordId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbError, DbResult};

/// Database row for artifacts.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArtifactRow {
    pub id: Uuid,
    pub repository_id: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub artifact_type: String,
    pub last_modified: DateTime<Utc>,
    pub origin: String,
    pub when_gathered: DateTime<Utc>,
}

impl From<ArtifactRow> for ArtifactRecord {
    fn from(row: ArtifactRow) -> Self {
        ArtifactRecord {
            id: row.id.into(),
            repository_id: row.repository_id,
            group_id: row.group_id,
            artifact_id: row.artifact_id,
            version: row.version,
            classifier: row.classifier,
            artifact_type: row.artifact_type,
            last_modified: row.last_modified,
            origin: row.origin,
            when_gathered: row.when_gathered,
        }
    }
}

#[async_trait]
pub trait ArtifactDao: Send + Sync {
    /// Insert a record, or refresh the stored record of the same artifact.
    async fn save(&self, record: &ArtifactRecord) -> DbResult<ArtifactRecord>;

    /// Find the record of an artifact in a repository.
    async fn find(
        &self,
        repository_id: &str,
        artifact: &ArtifactReference,
    ) -> DbResult<Option<ArtifactRecord>>;

    /// Delete a record.
    async fn delete(&self, id: RecordId) -> DbResult<()>;

    /// List every record of a repository.
    async fn list_by_repository(&self, repository_id: &str) -> DbResult<Vec<ArtifactRecord>>;
}

/// PostgreSQL implementation.
pub struct PgArtifactDao {
    pool: PgPool,
}

impl PgArtifactDao {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArtifactDao for PgArtifactDao {
    async fn save(&self, record: &ArtifactRecord) -> DbResult<ArtifactRecord> {
        let result = sqlx::query_as::<_, ArtifactRow>(
            r#"
            INSERT INTO artifacts (
                id, repository_id, group_id, artifact_id, version, classifier,
                artifact_type, last_modified, origin, when_gathered
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (
                repository_id, group_id, artifact_id, version, COALESCE(classifier, ''), artifact_type
            )
            DO UPDATE SET
                last_modified = EXCLUDED.last_modified,
                origin = EXCLUDED.origin,
                when_gathered = EXCLUDED.when_gathered
            RETURNING *
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.repository_id)
        .bind(&record.group_id)
        .bind(&record.artifact_id)
        .bind(&record.version)
        .bind(&record.classifier)
        .bind(&record.artifact_type)
        .bind(record.last_modified)
        .bind(&record.origin)
        .bind(record.when_gathered)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DbError::Duplicate(format!("artifact {}", record.id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(
        &self,
        repository_id: &str,
        artifact: &ArtifactReference,
    ) -> DbResult<Option<ArtifactRecord>> {
        let row = sqlx::query_as::<_, ArtifactRow>(
            r#"
            SELECT * FROM artifacts
            WHERE repository_id = $1
              AND group_id = $2
              AND artifact_id = $3
              AND version = $4
              AND classifier IS NOT DISTINCT FROM $5
              AND artifact_type = $6
            "#,
        )
        .bind(repository_id)
        .bind(&artifact.group_id)
        .bind(&artifact.artifact_id)
        .bind(&artifact.version)
        .bind(&artifact.classifier)
        .bind(&artifact.artifact_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: RecordId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM artifacts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("artifact {}", id)));
        }
        Ok(())
    }

    async fn list_by_repository(&self, repository_id: &str) -> DbResult<Vec<ArtifactRecord>> {
        let rows = sqlx::query_as::<_, ArtifactRow>(
            r#"
            SELECT * FROM artifacts
            WHERE repository_id = $1
            ORDER BY group_id, artifact_id, version, classifier NULLS FIRST, artifact_type
            "#,
        )
        .bind(repository_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
