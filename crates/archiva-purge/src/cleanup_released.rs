//! Remove snapshot versions that a newer version has superseded.
//!
//! When a snapshot's artifact directory also holds a newer version, the
//! whole snapshot version directory is deleted and the artifact-level
//! `maven-metadata*.xml` descriptors are rewritten to match the versions left
//! on disk.

use archiva_core::checksum::{ChecksumAlgorithm, is_checksum_file};
use archiva_core::layout::is_metadata_file;
use archiva_core::version::{self, MavenVersion};
use archiva_core::{DefaultLayout, RepositoryMetadata};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::strategy::{list_dirs, list_files};
use crate::{PurgeContext, PurgeResult, PurgeStrategy};

pub struct CleanupReleasedSnapshotsPurge {
    context: PurgeContext,
}

impl CleanupReleasedSnapshotsPurge {
    pub fn new(context: PurgeContext) -> Self {
        Self { context }
    }

    /// Rewrite every metadata descriptor directly under `artifact_dir`.
    async fn update_metadata(&self, artifact_dir: &Path) -> PurgeResult<()> {
        let versions = version_directories(artifact_dir).await?;

        for (name, path) in list_files(artifact_dir).await? {
            if !is_metadata_file(&name) || is_checksum_file(&name) {
                continue;
            }
            let Some(relative) = self.context.relative_path(&path) else {
                continue;
            };
            if let Err(e) = DefaultLayout.to_project_reference(&relative) {
                debug!(path = %relative, error = %e, "Skipping metadata outside a project directory");
                continue;
            }

            match rewrite_metadata(&path, &name, &versions).await {
                Ok(()) => info!(path = %relative, "Updated repository metadata"),
                Err(e) => warn!(path = %relative, error = %e, "Failed to update repository metadata"),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PurgeStrategy for CleanupReleasedSnapshotsPurge {
    fn name(&self) -> &'static str {
        "cleanup-released-snapshots"
    }

    async fn process(&self, path: &str) -> PurgeResult<()> {
        if !self.context.layout().has_version_directories() {
            return Ok(());
        }
        let Some((file, artifact)) = self.context.snapshot_target(path).await? else {
            return Ok(());
        };
        let Some(version_dir) = file.parent() else {
            return Ok(());
        };
        let Some(artifact_dir) = version_dir.parent() else {
            return Ok(());
        };

        let current = MavenVersion::parse(&artifact.base_version());
        let versions = version_directories(artifact_dir).await?;
        let Some(newer) = versions.iter().find(|v| MavenVersion::parse(v) > current) else {
            return Ok(());
        };

        info!(
            repository = %self.context.repository().id,
            artifact = %artifact.versioned(),
            superseded_by = %newer,
            "Removing superseded snapshot version"
        );

        let artifacts: Vec<_> = list_files(version_dir)
            .await?
            .into_iter()
            .filter(|(name, _)| !is_checksum_file(name))
            .map(|(_, file)| file)
            .collect();
        // Records outlive a failed removal.
        tokio::fs::remove_dir_all(version_dir).await?;
        for file in &artifacts {
            self.context.remove_record(file).await;
        }

        self.update_metadata(artifact_dir).await
    }
}

/// Names of the version directories under an artifact directory, ascending.
async fn version_directories(artifact_dir: &Path) -> PurgeResult<Vec<String>> {
    let mut versions: Vec<String> = list_dirs(artifact_dir)
        .await?
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| version::is_version(name))
        .collect();
    version::sort_versions(&mut versions);
    Ok(versions)
}

async fn rewrite_metadata(path: &Path, name: &str, versions: &[String]) -> PurgeResult<()> {
    let xml = tokio::fs::read_to_string(path).await?;
    let mut metadata = RepositoryMetadata::from_xml(&xml)?;

    metadata.set_available_versions(versions.to_vec());
    metadata.set_latest_version(versions.last().cloned());
    metadata.set_released_version(
        versions
            .iter()
            .rev()
            .find(|v| !version::is_snapshot(v))
            .cloned(),
    );
    metadata.set_last_updated(Utc::now());

    let xml = metadata.to_xml()?;
    tokio::fs::write(path, &xml).await?;

    for algorithm in ChecksumAlgorithm::ALL {
        let side_file = path.with_file_name(algorithm.side_file(name));
        if tokio::fs::try_exists(&side_file).await? {
            tokio::fs::write(&side_file, algorithm.side_file_content(xml.as_bytes(), name)).await?;
        }
    }
    Ok(())
}
