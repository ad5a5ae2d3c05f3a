//! On-disk repository fixtures for tests.

use archiva_config::ManagedRepository;
use archiva_core::{ArtifactRecord, ArtifactReference, RecordId};
use archiva_db::{ArtifactDao, DbError, DbResult, MemoryArtifactDao};
use async_trait::async_trait;
use chrono::Utc;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use crate::PurgeContext;

pub const REPOSITORY_ID: &str = "test-repo";

pub struct Fixture {
    pub dir: TempDir,
    pub dao: Arc<MemoryArtifactDao>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            dao: Arc::new(MemoryArtifactDao::new()),
        }
    }

    pub fn repository(&self) -> ManagedRepository {
        ManagedRepository::new(REPOSITORY_ID, self.dir.path())
    }

    pub fn context(&self, repository: ManagedRepository) -> PurgeContext {
        PurgeContext::new(repository, self.dao.clone())
    }

    /// Context whose database calls fail as described by `failure`.
    pub fn failing_context(&self, failure: DaoFailure) -> PurgeContext {
        let dao = FailingArtifactDao {
            inner: self.dao.clone(),
            failure,
        };
        PurgeContext::new(self.repository(), Arc::new(dao))
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn create(&self, relative: &str) -> PathBuf {
        self.write(relative, relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Create `<dir>/<name>.jar` and `.pom` with their checksum side-files.
    pub fn create_build(&self, dir: &str, name: &str) -> Vec<String> {
        let mut created = Vec::new();
        for extension in ["jar", "jar.md5", "jar.sha1", "pom", "pom.md5", "pom.sha1"] {
            let relative = format!("{}/{}.{}", dir, name, extension);
            self.create(&relative);
            created.push(relative);
        }
        created
    }

    pub fn set_age_days(&self, relative: &str, days: u64) {
        let file = File::options().write(true).open(self.path(relative)).unwrap();
        let modified = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
        file.set_modified(modified).unwrap();
    }

    /// Store the database record of an artifact file in the default layout.
    pub async fn register(&self, relative: &str) -> ArtifactRecord {
        let artifact = self
            .repository()
            .layout()
            .to_artifact_reference(relative)
            .unwrap();
        self.dao
            .save(&ArtifactRecord::new(REPOSITORY_ID, &artifact, Utc::now()))
            .await
            .unwrap()
    }

    pub async fn record_versions(&self) -> Vec<String> {
        self.dao
            .list_by_repository(REPOSITORY_ID)
            .await
            .unwrap()
            .into_iter()
            .map(|r| format!("{}:{}", r.version, r.artifact_type))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum DaoFailure {
    Lookup,
    Delete,
}

/// Reads and saves through to the fixture's store; lookups or deletes fail.
pub struct FailingArtifactDao {
    inner: Arc<MemoryArtifactDao>,
    failure: DaoFailure,
}

fn unavailable() -> DbError {
    DbError::Database(sqlx::Error::PoolClosed)
}

#[async_trait]
impl ArtifactDao for FailingArtifactDao {
    async fn save(&self, record: &ArtifactRecord) -> DbResult<ArtifactRecord> {
        self.inner.save(record).await
    }

    async fn find(
        &self,
        repository_id: &str,
        artifact: &ArtifactReference,
    ) -> DbResult<Option<ArtifactRecord>> {
        match self.failure {
            DaoFailure::Lookup => Err(unavailable()),
            DaoFailure::Delete => self.inner.find(repository_id, artifact).await,
        }
    }

    async fn delete(&self, id: RecordId) -> DbResult<()> {
        match self.failure {
            DaoFailure::Lookup => self.inner.delete(id).await,
            DaoFailure::Delete => Err(unavailable()),
        }
    }

    async fn list_by_repository(&self, repository_id: &str) -> DbResult<Vec<ArtifactRecord>> {
        self.inner.list_by_repository(repository_id).await
    }
}
