//! Repository walking.

use archiva_config::ManagedRepository;
use async_trait::async_trait;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::PurgeResult;
use crate::strategy::relative_path;

/// Receives the files of a repository scan.
#[async_trait]
pub trait RepositoryConsumer: Send {
    fn id(&self) -> &str;

    /// Whether `path`, relative to the repository root, should be processed.
    fn accepts(&self, path: &str) -> bool;

    fn begin_scan(&mut self) {}

    async fn process_file(&mut self, path: &str) -> PurgeResult<()>;

    fn complete_scan(&mut self) {}
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStatistics {
    pub repository_id: String,
    pub files_visited: u64,
    pub files_processed: u64,
    pub files_failed: u64,
    pub duration: Duration,
}

/// Walks a managed repository and hands each file to a consumer, one at a
/// time.
pub struct RepositoryScanner {
    repository_id: String,
    root: PathBuf,
}

impl RepositoryScanner {
    pub fn new(repository: &ManagedRepository) -> Self {
        Self {
            repository_id: repository.id.clone(),
            root: repository.location.clone(),
        }
    }

    pub async fn scan<C>(&self, consumer: &mut C) -> PurgeResult<ScanStatistics>
    where
        C: RepositoryConsumer + ?Sized,
    {
        let started = Instant::now();
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || collect_files(&root))
            .await
            .map_err(io::Error::other)??;

        info!(
            repository = %self.repository_id,
            consumer = consumer.id(),
            files = files.len(),
            "Starting repository scan"
        );

        let mut stats = ScanStatistics {
            repository_id: self.repository_id.clone(),
            ..Default::default()
        };

        consumer.begin_scan();
        for path in &files {
            stats.files_visited += 1;
            if !consumer.accepts(path) {
                continue;
            }
            // Files purged as siblings earlier in the walk are still offered;
            // consumers treat them as no-ops.
            match consumer.process_file(path).await {
                Ok(()) => stats.files_processed += 1,
                Err(e) => {
                    stats.files_failed += 1;
                    debug!(path = %path, error = %e, "File failed, continuing scan");
                }
            }
        }
        consumer.complete_scan();

        stats.duration = started.elapsed();
        info!(
            repository = %self.repository_id,
            visited = stats.files_visited,
            processed = stats.files_processed,
            failed = stats.files_failed,
            duration_ms = stats.duration.as_millis() as u64,
            "Repository scan complete"
        );
        Ok(stats)
    }
}

/// Every regular file under `root` as a `/`-separated relative path, in name
/// order.
fn collect_files(root: &Path) -> PurgeResult<Vec<String>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("repository root {} is not a directory", root.display()),
        )
        .into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable repository entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(relative) = relative_path(root, entry.path()) {
            files.push(relative);
        }
    }
    Ok(files)
}
