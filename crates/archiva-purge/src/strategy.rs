//! The purge strategy trait and the file handling shared by all strategies.

use archiva_config::ManagedRepository;
use archiva_core::checksum::is_checksum_file;
use archiva_core::{ArtifactReference, RepositoryLayout};
use archiva_db::ArtifactDao;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::PurgeResult;

/// A policy deciding which files an artifact path makes eligible for removal.
///
/// Implementations are stateless between calls; processing a path whose file
/// no longer exists is a no-op.
#[async_trait]
pub trait PurgeStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Purge what `path`, relative to the repository root, makes eligible.
    async fn process(&self, path: &str) -> PurgeResult<()>;
}

/// Repository, layout and artifact database shared by the strategies.
#[derive(Clone)]
pub struct PurgeContext {
    repository: ManagedRepository,
    layout: Arc<dyn RepositoryLayout>,
    dao: Arc<dyn ArtifactDao>,
}

impl PurgeContext {
    pub fn new(repository: ManagedRepository, dao: Arc<dyn ArtifactDao>) -> Self {
        let layout = repository.layout();
        Self {
            repository,
            layout,
            dao,
        }
    }

    pub fn repository(&self) -> &ManagedRepository {
        &self.repository
    }

    pub fn layout(&self) -> &dyn RepositoryLayout {
        self.layout.as_ref()
    }

    pub fn root(&self) -> &Path {
        &self.repository.location
    }

    /// Resolve `path` to an existing snapshot artifact file.
    ///
    /// Returns `None` when the file is gone or its version is a release; a
    /// path the layout cannot parse is an error.
    pub(crate) async fn snapshot_target(
        &self,
        path: &str,
    ) -> PurgeResult<Option<(PathBuf, ArtifactReference)>> {
        let relative = path.trim_start_matches('/');
        let file = self.root().join(relative);

        match tokio::fs::metadata(&file).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %relative, "File already gone");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let artifact = self.layout.to_artifact_reference(relative)?;
        if !artifact.is_snapshot() {
            return Ok(None);
        }
        Ok(Some((file, artifact)))
    }

    /// Files in `dir` named `prefix` followed by `.`, `-` or nothing.
    pub(crate) async fn sibling_files(&self, dir: &Path, prefix: &str) -> PurgeResult<Vec<PathBuf>> {
        Ok(list_files(dir)
            .await?
            .into_iter()
            .filter(|(name, _)| has_sibling_prefix(name, prefix))
            .map(|(_, path)| path)
            .collect())
    }

    /// Delete `files` and the database records of the artifacts among them.
    ///
    /// Returns the number of files removed.
    pub(crate) async fn purge_files(&self, files: &[PathBuf]) -> PurgeResult<usize> {
        let mut deleted = 0;
        for file in files {
            match tokio::fs::remove_file(file).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
            deleted += 1;
            debug!(path = %file.display(), "Deleted file");

            let is_checksum = file
                .file_name()
                .and_then(|n| n.to_str())
                .is_none_or(is_checksum_file);
            if !is_checksum {
                self.remove_record(file).await;
            }
        }
        Ok(deleted)
    }

    /// Delete the database record of an artifact file.
    ///
    /// Database failures are logged and swallowed; the filesystem stays
    /// authoritative.
    pub(crate) async fn remove_record(&self, file: &Path) {
        let Some(relative) = self.relative_path(file) else {
            return;
        };
        let artifact = match self.layout.to_artifact_reference(&relative) {
            Ok(artifact) => artifact,
            Err(e) => {
                debug!(path = %relative, error = %e, "Not an artifact, no record to remove");
                return;
            }
        };

        match self.dao.find(&self.repository.id, &artifact).await {
            Ok(Some(record)) => {
                if let Err(e) = self.dao.delete(record.id).await {
                    warn!(artifact = %artifact, error = %e, "Failed to delete artifact record");
                }
            }
            Ok(None) => debug!(artifact = %artifact, "No artifact record"),
            Err(e) => warn!(artifact = %artifact, error = %e, "Failed to look up artifact record"),
        }
    }

    /// `/`-separated path of `file` relative to the repository root.
    pub(crate) fn relative_path(&self, file: &Path) -> Option<String> {
        relative_path(self.root(), file)
    }
}

pub(crate) fn relative_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Regular files directly inside `dir`, sorted by name.
pub(crate) async fn list_files(dir: &Path) -> PurgeResult<Vec<(String, PathBuf)>> {
    list_entries(dir, false).await
}

/// Subdirectories directly inside `dir`, sorted by name.
pub(crate) async fn list_dirs(dir: &Path) -> PurgeResult<Vec<(String, PathBuf)>> {
    list_entries(dir, true).await
}

async fn list_entries(dir: &Path, directories: bool) -> PurgeResult<Vec<(String, PathBuf)>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        let wanted = if directories {
            file_type.is_dir()
        } else {
            file_type.is_file()
        };
        if !wanted {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            found.push((name, entry.path()));
        }
    }
    found.sort();
    Ok(found)
}

/// `name` starts with `prefix` and the prefix ends at a `.` or `-` boundary.
///
/// Keeps build `-1` from claiming the files of build `-10`.
pub(crate) fn has_sibling_prefix(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with('-'),
        None => false,
    }
}
