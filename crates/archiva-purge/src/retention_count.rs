//! Keep only the newest snapshot builds of a version.

use archiva_core::checksum::is_checksum_file;
use archiva_core::filename::parse_filename;
use archiva_core::version::MavenVersion;
use async_trait::async_trait;
use tracing::info;

use crate::strategy::list_files;
use crate::{PurgeContext, PurgeResult, PurgeStrategy};

pub struct RetentionCountPurge {
    context: PurgeContext,
    retention_count: u32,
}

impl RetentionCountPurge {
    pub fn new(context: PurgeContext, retention_count: u32) -> Self {
        Self {
            context,
            retention_count,
        }
    }
}

#[async_trait]
impl PurgeStrategy for RetentionCountPurge {
    fn name(&self) -> &'static str {
        "retention-count"
    }

    async fn process(&self, path: &str) -> PurgeResult<()> {
        let Some((file, artifact)) = self.context.snapshot_target(path).await? else {
            return Ok(());
        };
        let Some(dir) = file.parent() else {
            return Ok(());
        };
        let base_version = artifact.base_version();

        // One entry per build, keyed by `artifactId-version`.
        let mut builds: Vec<(MavenVersion, String)> = Vec::new();
        for (name, _) in list_files(dir).await? {
            if is_checksum_file(&name) {
                continue;
            }
            let Some(parts) = parse_filename(&name, &artifact.artifact_id, &base_version) else {
                continue;
            };
            let key = parts.unique_version_key();
            if !builds.iter().any(|(_, k)| *k == key) {
                builds.push((MavenVersion::parse(&parts.version), key));
            }
        }

        let keep = self.retention_count as usize;
        if builds.len() <= keep {
            return Ok(());
        }
        builds.sort();

        let expired = builds.len() - keep;
        for (version, key) in builds.into_iter().take(expired) {
            let siblings = self.context.sibling_files(dir, &key).await?;
            let deleted = self.context.purge_files(&siblings).await?;
            info!(
                repository = %self.context.repository().id,
                artifact = %artifact.artifact_id,
                version = %version,
                files = deleted,
                "Purged snapshot build beyond retention count"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PurgeError;
    use crate::fixture::{DaoFailure, Fixture};

    const VERSION_DIR: &str = "org/jruby/plugins/jruby-rake-plugin/1.0RC1-SNAPSHOT";
    const BUILDS: [&str; 4] = [
        "jruby-rake-plugin-1.0RC1-20070504.153317-1",
        "jruby-rake-plugin-1.0RC1-20070504.160758-2",
        "jruby-rake-plugin-1.0RC1-20070505.090015-3",
        "jruby-rake-plugin-1.0RC1-20070506.090132-4",
    ];

    async fn setup(fixture: &Fixture) -> Vec<Vec<String>> {
        fixture.create(&format!("{}/maven-metadata.xml", VERSION_DIR));
        let mut builds = Vec::new();
        for build in BUILDS {
            let files = fixture.create_build(VERSION_DIR, build);
            fixture.register(&files[0]).await;
            fixture.register(&files[3]).await;
            builds.push(files);
        }
        builds
    }

    #[tokio::test]
    async fn test_keeps_newest_builds() {
        let fixture = Fixture::new();
        let builds = setup(&fixture).await;
        let purge = RetentionCountPurge::new(fixture.context(fixture.repository()), 2);

        purge.process(&builds[0][0]).await.unwrap();

        for file in builds[0].iter().chain(&builds[1]) {
            assert!(!fixture.exists(file), "{} should be purged", file);
        }
        for file in builds[2].iter().chain(&builds[3]) {
            assert!(fixture.exists(file), "{} should be kept", file);
        }
        assert!(fixture.exists(&format!("{}/maven-metadata.xml", VERSION_DIR)));

        assert_eq!(
            fixture.record_versions().await,
            vec![
                "1.0RC1-20070505.090015-3:jar",
                "1.0RC1-20070505.090015-3:pom",
                "1.0RC1-20070506.090132-4:jar",
                "1.0RC1-20070506.090132-4:pom",
            ]
        );
    }

    #[tokio::test]
    async fn test_processing_twice_is_idempotent() {
        let fixture = Fixture::new();
        let builds = setup(&fixture).await;
        let purge = RetentionCountPurge::new(fixture.context(fixture.repository()), 2);

        purge.process(&builds[0][0]).await.unwrap();
        purge.process(&builds[0][0]).await.unwrap();
        purge.process(&builds[2][0]).await.unwrap();

        assert!(builds[2].iter().chain(&builds[3]).all(|f| fixture.exists(f)));
        assert_eq!(fixture.dao.len().await, 4);
    }

    #[tokio::test]
    async fn test_within_retention_count_is_untouched() {
        let fixture = Fixture::new();
        let builds = setup(&fixture).await;
        let purge = RetentionCountPurge::new(fixture.context(fixture.repository()), 4);

        purge.process(&builds[0][0]).await.unwrap();

        assert!(builds.iter().flatten().all(|f| fixture.exists(f)));
        assert_eq!(fixture.dao.len().await, 8);
    }

    #[tokio::test]
    async fn test_build_numbers_do_not_collide() {
        let fixture = Fixture::new();
        let dir = "org/acme/lib/1.0-SNAPSHOT";
        let first = fixture.create_build(dir, "lib-1.0-20070504.153317-1");
        let tenth = fixture.create_build(dir, "lib-1.0-20070504.153317-10");
        let eleventh = fixture.create_build(dir, "lib-1.0-20070504.153317-11");
        let purge = RetentionCountPurge::new(fixture.context(fixture.repository()), 2);

        purge.process(&first[0]).await.unwrap();

        assert!(first.iter().all(|f| !fixture.exists(f)));
        assert!(tenth.iter().chain(&eleventh).all(|f| fixture.exists(f)));
    }

    #[tokio::test]
    async fn test_foreign_files_are_ignored() {
        let fixture = Fixture::new();
        let builds = setup(&fixture).await;
        let readme = format!("{}/README.txt", VERSION_DIR);
        fixture.create(&readme);
        let purge = RetentionCountPurge::new(fixture.context(fixture.repository()), 3);

        purge.process(&builds[3][0]).await.unwrap();

        assert!(fixture.exists(&readme));
        assert!(builds[0].iter().all(|f| !fixture.exists(f)));
        assert!(builds[1].iter().all(|f| fixture.exists(f)));
    }

    #[tokio::test]
    async fn test_release_is_never_purged() {
        let fixture = Fixture::new();
        let dir = "org/acme/lib/1.0";
        let release = fixture.create_build(dir, "lib-1.0");
        let purge = RetentionCountPurge::new(fixture.context(fixture.repository()), 1);

        purge.process(&release[0]).await.unwrap();

        assert!(release.iter().all(|f| fixture.exists(f)));
    }

    #[tokio::test]
    async fn test_unparseable_path_is_an_error() {
        let fixture = Fixture::new();
        fixture.create("stray/file.jar");
        let purge = RetentionCountPurge::new(fixture.context(fixture.repository()), 2);

        let result = purge.process("stray/file.jar").await;
        assert!(matches!(result, Err(PurgeError::Layout(_))));
    }

    #[tokio::test]
    async fn test_record_delete_failure_does_not_stop_purge() {
        let fixture = Fixture::new();
        let builds = setup(&fixture).await;
        let purge = RetentionCountPurge::new(fixture.failing_context(DaoFailure::Delete), 2);

        purge.process(&builds[0][0]).await.unwrap();

        assert!(builds[0].iter().chain(&builds[1]).all(|f| !fixture.exists(f)));
        assert!(builds[2].iter().chain(&builds[3]).all(|f| fixture.exists(f)));
        assert_eq!(fixture.dao.len().await, 8);
    }
}
