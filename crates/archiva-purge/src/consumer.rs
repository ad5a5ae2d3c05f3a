//! The repository purge consumer.

use archiva_config::ManagedRepository;
use archiva_db::ArtifactDao;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::pattern::{self, FilePattern};
use crate::{
    CleanupReleasedSnapshotsPurge, DaysOlderPurge, PurgeContext, PurgeResult, PurgeStrategy,
    RepositoryConsumer, RetentionCountPurge,
};

pub const CONSUMER_ID: &str = "repository-purge";

/// Artifact files offered to the purge strategies.
pub const DEFAULT_INCLUDES: &[&str] = &[
    "**/*.pom",
    "**/*.jar",
    "**/*.ear",
    "**/*.war",
    "**/*.car",
    "**/*.sar",
    "**/*.mar",
    "**/*.rar",
    "**/*.dtd",
    "**/*.tld",
    "**/*.tar.gz",
    "**/*.tar.bz2",
    "**/*.zip",
];

pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/*.md5",
    "**/*.sha1",
    "**/*.asc",
    "**/maven-metadata*.xml",
    "**/.index/**",
    "**/.svn/**",
    "**/*.tmp",
];

/// Which build-level purge a repository uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeStrategyKind {
    RetentionCount(u32),
    DaysOlder(u32),
}

impl PurgeStrategyKind {
    /// Age-based purge when `days_older` is set, count-based otherwise.
    pub fn for_repository(repository: &ManagedRepository) -> Self {
        if repository.days_older > 0 {
            PurgeStrategyKind::DaysOlder(repository.days_older)
        } else {
            PurgeStrategyKind::RetentionCount(repository.retention_count)
        }
    }

    pub fn build(self, context: PurgeContext) -> Box<dyn PurgeStrategy> {
        match self {
            PurgeStrategyKind::RetentionCount(count) => {
                Box::new(RetentionCountPurge::new(context, count))
            }
            PurgeStrategyKind::DaysOlder(days) => Box::new(DaysOlderPurge::new(context, days)),
        }
    }
}

/// Applies a repository's purge policy to each scanned artifact file.
pub struct RepositoryPurgeConsumer {
    repository_id: String,
    strategy: Box<dyn PurgeStrategy>,
    cleanup: Option<CleanupReleasedSnapshotsPurge>,
    includes: Vec<FilePattern>,
    excludes: Vec<FilePattern>,
    processed: u64,
    failed: u64,
}

impl RepositoryPurgeConsumer {
    pub fn new(repository: ManagedRepository, dao: Arc<dyn ArtifactDao>) -> PurgeResult<Self> {
        let kind = PurgeStrategyKind::for_repository(&repository);
        let repository_id = repository.id.clone();
        let cleanup_enabled = repository.delete_released_snapshots;
        let context = PurgeContext::new(repository, dao);

        Ok(Self {
            repository_id,
            cleanup: cleanup_enabled.then(|| CleanupReleasedSnapshotsPurge::new(context.clone())),
            strategy: kind.build(context),
            includes: pattern::compile(DEFAULT_INCLUDES)?,
            excludes: pattern::compile(DEFAULT_EXCLUDES)?,
            processed: 0,
            failed: 0,
        })
    }

    /// Replace the default include and exclude patterns.
    pub fn with_patterns<S: AsRef<str>>(mut self, includes: &[S], excludes: &[S]) -> PurgeResult<Self> {
        self.includes = pattern::compile(includes)?;
        self.excludes = pattern::compile(excludes)?;
        Ok(self)
    }

    pub fn description(&self) -> &'static str {
        "Purge repository of old snapshots"
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(FilePattern::as_str)
    }

    pub fn excludes(&self) -> impl Iterator<Item = &str> {
        self.excludes.iter().map(FilePattern::as_str)
    }

    pub fn processed_count(&self) -> u64 {
        self.processed
    }

    pub fn failed_count(&self) -> u64 {
        self.failed
    }

    async fn purge(&self, path: &str) -> PurgeResult<()> {
        if let Some(cleanup) = &self.cleanup {
            cleanup.process(path).await?;
        }
        self.strategy.process(path).await
    }
}

#[async_trait]
impl RepositoryConsumer for RepositoryPurgeConsumer {
    fn id(&self) -> &str {
        CONSUMER_ID
    }

    fn accepts(&self, path: &str) -> bool {
        self.includes.iter().any(|p| p.matches(path)) && !self.excludes.iter().any(|p| p.matches(path))
    }

    fn begin_scan(&mut self) {
        self.processed = 0;
        self.failed = 0;
        info!(
            repository = %self.repository_id,
            strategy = self.strategy.name(),
            cleanup_released_snapshots = self.cleanup.is_some(),
            "Beginning repository purge"
        );
    }

    async fn process_file(&mut self, path: &str) -> PurgeResult<()> {
        let result = self.purge(path).await;
        match &result {
            Ok(()) => self.processed += 1,
            Err(e) => {
                self.failed += 1;
                warn!(repository = %self.repository_id, path = %path, error = %e, "Failed to purge path");
            }
        }
        result
    }

    fn complete_scan(&mut self) {
        info!(
            repository = %self.repository_id,
            processed = self.processed,
            failed = self.failed,
            "Completed repository purge"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Fixture;

    #[test]
    fn test_strategy_selection() {
        let mut repository = ManagedRepository::new("internal", "/repo");
        repository.days_older = 30;
        repository.retention_count = 5;
        assert_eq!(
            PurgeStrategyKind::for_repository(&repository),
            PurgeStrategyKind::DaysOlder(30)
        );

        repository.days_older = 0;
        assert_eq!(
            PurgeStrategyKind::for_repository(&repository),
            PurgeStrategyKind::RetentionCount(5)
        );
    }

    #[tokio::test]
    async fn test_consumer_identity() {
        let fixture = Fixture::new();
        let consumer = RepositoryPurgeConsumer::new(fixture.repository(), fixture.dao.clone()).unwrap();
        assert_eq!(consumer.id(), "repository-purge");
        assert_eq!(consumer.strategy_name(), "days-older");
        assert!(consumer.includes().any(|p| p == "**/*.jar"));
        assert!(consumer.excludes().any(|p| p == "**/*.sha1"));
    }

    #[tokio::test]
    async fn test_accepts_artifacts_only() {
        let fixture = Fixture::new();
        let consumer = RepositoryPurgeConsumer::new(fixture.repository(), fixture.dao.clone()).unwrap();
        assert!(consumer.accepts("org/acme/lib/1.0/lib-1.0.jar"));
        assert!(consumer.accepts("org/acme/lib/1.0/lib-1.0.pom"));
        assert!(consumer.accepts("org/acme/lib/1.0/lib-1.0-bin.tar.gz"));
        assert!(!consumer.accepts("org/acme/lib/1.0/lib-1.0.jar.sha1"));
        assert!(!consumer.accepts("org/acme/lib/maven-metadata.xml"));
        assert!(!consumer.accepts(".index/segments.gen"));
        assert!(!consumer.accepts("org/acme/lib/1.0/notes.txt"));

        let consumer = consumer
            .with_patterns(&["**/*.txt"], &[])
            .unwrap();
        assert!(consumer.accepts("org/acme/lib/1.0/notes.txt"));
        assert!(!consumer.accepts("org/acme/lib/1.0/lib-1.0.jar"));
    }

    #[tokio::test]
    async fn test_cleanup_runs_before_strategy() {
        let fixture = Fixture::new();
        let artifact_dir = "org/acme/lib";
        let snapshot = fixture.create_build(&format!("{}/1.0-SNAPSHOT", artifact_dir), "lib-1.0-SNAPSHOT");
        fixture.create_build(&format!("{}/1.0", artifact_dir), "lib-1.0");

        let mut repository = fixture.repository();
        repository.delete_released_snapshots = true;
        let mut consumer = RepositoryPurgeConsumer::new(repository, fixture.dao.clone()).unwrap();

        consumer.begin_scan();
        consumer.process_file(&snapshot[0]).await.unwrap();
        consumer.process_file(&snapshot[3]).await.unwrap();
        consumer.complete_scan();

        assert!(!fixture.exists(&format!("{}/1.0-SNAPSHOT", artifact_dir)));
        assert!(fixture.exists(&format!("{}/1.0/lib-1.0.jar", artifact_dir)));
        assert_eq!(consumer.processed_count(), 2);
        assert_eq!(consumer.failed_count(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_counted() {
        let fixture = Fixture::new();
        fixture.create("stray/file.jar");
        let mut consumer = RepositoryPurgeConsumer::new(fixture.repository(), fixture.dao.clone()).unwrap();

        consumer.begin_scan();
        assert!(consumer.process_file("stray/file.jar").await.is_err());
        consumer.process_file("org/acme/lib/1.0/lib-1.0.jar").await.unwrap();

        assert_eq!(consumer.failed_count(), 1);
        assert_eq!(consumer.processed_count(), 1);
    }
}
