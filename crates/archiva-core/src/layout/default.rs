//! Maven 2 default layout:
//! `<groupId as dirs>/<artifactId>/<baseVersion>/<artifactId>-<version>[-<classifier>].<ext>`

use super::{LayoutKind, METADATA_FILENAME, RepositoryLayout, is_metadata_file, path_segments};
use crate::artifact_type;
use crate::filename::{FilenameLexer, FilenameTail};
use crate::version;
use crate::{ArtifactReference, LayoutError, LayoutResult, ProjectReference, VersionedReference};

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

impl DefaultLayout {
    /// `<groupId>/<artifactId>`
    pub fn to_project_path(&self, project: &ProjectReference) -> String {
        format!("{}/{}", group_path(&project.group_id), project.artifact_id)
    }

    /// `<groupId>/<artifactId>/<baseVersion>`
    pub fn to_version_path(&self, reference: &VersionedReference) -> String {
        format!(
            "{}/{}/{}",
            group_path(&reference.group_id),
            reference.artifact_id,
            version::base_version(&reference.version)
        )
    }

    pub fn to_project_metadata_path(&self, project: &ProjectReference) -> String {
        format!("{}/{}", self.to_project_path(project), METADATA_FILENAME)
    }

    pub fn to_version_metadata_path(&self, reference: &VersionedReference) -> String {
        format!("{}/{}", self.to_version_path(reference), METADATA_FILENAME)
    }

    /// Resolve an artifactId-level metadata path such as
    /// `org/apache/maven/maven-model/maven-metadata.xml`.
    pub fn to_project_reference(&self, path: &str) -> LayoutResult<ProjectReference> {
        let segments = metadata_segments(path)?;
        let n = segments.len();
        if n < 3 {
            return Err(LayoutError::TooFewSegments {
                path: path.to_string(),
                required: 3,
            });
        }
        Ok(ProjectReference::new(
            segments[..n - 2].join("."),
            &segments[n - 2],
        ))
    }

    /// Resolve a version-level metadata path such as
    /// `org/apache/maven/maven-model/2.0-SNAPSHOT/maven-metadata.xml`.
    pub fn to_versioned_reference(&self, path: &str) -> LayoutResult<VersionedReference> {
        let segments = metadata_segments(path)?;
        let n = segments.len();
        if n < 4 {
            return Err(LayoutError::TooFewSegments {
                path: path.to_string(),
                required: 4,
            });
        }
        let version = &segments[n - 2];
        if !version::is_version(version) {
            return Err(LayoutError::InvalidMetadataPath {
                path: path.to_string(),
                message: format!("'{}' is not a version directory", version),
            });
        }
        Ok(VersionedReference::new(
            segments[..n - 3].join("."),
            &segments[n - 3],
            version,
        ))
    }
}

impl RepositoryLayout for DefaultLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Default
    }

    fn to_artifact_reference(&self, path: &str) -> LayoutResult<ArtifactReference> {
        if path.trim().is_empty() {
            return Err(LayoutError::BlankPath);
        }
        let segments = path_segments(path);
        let n = segments.len();
        if n < 4 {
            return Err(LayoutError::TooFewSegments {
                path: path.to_string(),
                required: 4,
            });
        }

        let filename = &segments[n - 1];
        let dir_version = &segments[n - 2];
        let artifact_id = &segments[n - 3];
        let group_id = segments[..n - 3].join(".");

        let mut lexer = FilenameLexer::new(filename);
        if lexer.expect(artifact_id).is_none() {
            return Err(LayoutError::invalid(
                path,
                format!("filename does not start with artifactId '{}'", artifact_id),
            ));
        }

        let artifact_version = match lexer.expect(dir_version) {
            Some(v) => v,
            None if version::is_snapshot(dir_version) => {
                let v = lexer.next_version().ok_or_else(|| {
                    LayoutError::invalid(path, "no version found in snapshot filename")
                })?;
                if version::base_version(&v) != *dir_version {
                    return Err(LayoutError::SnapshotLocation {
                        path: path.to_string(),
                        expected: version::base_version(&v),
                    });
                }
                v
            }
            None => {
                return Err(LayoutError::invalid(
                    path,
                    "version declared in directory path does not match the filename",
                ));
            }
        };

        let extension = lexer
            .extension()
            .ok_or_else(|| LayoutError::invalid(path, "no type was specified"))?
            .to_string();

        let (classifier, mut artifact_type) = match lexer.tail() {
            FilenameTail::Classifier(classifier) => {
                let artifact_type =
                    artifact_type::for_extension_and_classifier(Some(&classifier), &extension);
                (Some(classifier), artifact_type)
            }
            FilenameTail::CompoundExtension(prefix) => (None, format!("{}.{}", prefix, extension)),
            FilenameTail::Bare => (None, artifact_type::for_extension(&extension)),
        };

        if artifact_type == "jar" && artifact_type::is_maven_plugin(artifact_id) {
            artifact_type = artifact_type::MAVEN_PLUGIN.to_string();
        }

        if version::is_snapshot(&artifact_version) {
            if !version::is_generic_snapshot(dir_version) {
                return Err(LayoutError::SnapshotLocation {
                    path: path.to_string(),
                    expected: version::base_version(&artifact_version),
                });
            }
        } else if *dir_version != artifact_version {
            return Err(LayoutError::invalid(
                path,
                "version declared in directory path does not match the filename",
            ));
        }

        Ok(ArtifactReference::new(
            group_id,
            artifact_id,
            artifact_version,
            classifier,
            artifact_type,
        ))
    }

    fn to_path(&self, artifact: &ArtifactReference) -> String {
        let mut path = format!(
            "{}/{}/{}/{}-{}",
            group_path(&artifact.group_id),
            artifact.artifact_id,
            artifact.base_version(),
            artifact.artifact_id,
            artifact.version
        );
        if let Some(classifier) = &artifact.classifier {
            path.push('-');
            path.push_str(classifier);
        }
        path.push('.');
        path.push_str(artifact_type::extension_for_type(&artifact.artifact_type));
        path
    }
}

fn group_path(group_id: &str) -> String {
    group_id.replace('.', "/")
}

fn metadata_segments(path: &str) -> LayoutResult<Vec<String>> {
    let segments = path_segments(path);
    match segments.last() {
        Some(name) if is_metadata_file(name) => Ok(segments),
        _ => Err(LayoutError::InvalidMetadataPath {
            path: path.to_string(),
            message: "not a maven-metadata.xml file".to_string(),
        }),
    }
}
