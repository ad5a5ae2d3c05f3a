//! Maven 1 legacy layout:
//! `<groupId>/<type>s/<artifactId>-<version>[-<classifier>].<ext>`

use super::{LayoutKind, RepositoryLayout, path_segments};
use crate::artifact_type;
use crate::filename::{FilenameTail, parse_filename_unanchored};
use crate::{ArtifactReference, LayoutError, LayoutResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyLayout;

/// Directory name used for an artifact type.
fn type_directory(artifact_type: &str) -> String {
    match artifact_type {
        "maven-plugin" => "plugins".to_string(),
        "java-source" => "java-sources".to_string(),
        "javadoc" => "javadoc.jars".to_string(),
        "distribution-tgz" | "distribution-bzip" | "distribution-zip" => {
            "distributions".to_string()
        }
        other => format!("{}s", other),
    }
}

/// Artifact type implied by a type directory; `None` when the extension decides.
fn directory_type(directory: &str) -> Option<Option<String>> {
    match directory {
        "plugins" => Some(Some(artifact_type::MAVEN_PLUGIN.to_string())),
        "java-sources" => Some(Some(artifact_type::JAVA_SOURCE.to_string())),
        "javadoc.jars" => Some(Some(artifact_type::JAVADOC.to_string())),
        "distributions" => Some(None),
        other => other
            .strip_suffix('s')
            .filter(|t| !t.is_empty())
            .map(|t| Some(t.to_string())),
    }
}

impl RepositoryLayout for LegacyLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Legacy
    }

    fn to_artifact_reference(&self, path: &str) -> LayoutResult<ArtifactReference> {
        if path.trim().is_empty() {
            return Err(LayoutError::BlankPath);
        }
        let segments = path_segments(path);
        if segments.len() != 3 {
            return Err(LayoutError::TooFewSegments {
                path: path.to_string(),
                required: 3,
            });
        }
        let group_id = &segments[0];
        let directory = &segments[1];
        let filename = &segments[2];

        let expected_type = directory_type(directory).ok_or_else(|| {
            LayoutError::invalid(path, format!("'{}' is not a type directory", directory))
        })?;

        let parts = parse_filename_unanchored(filename).ok_or_else(|| {
            LayoutError::invalid(path, "filename has no artifactId, version and type")
        })?;
        let extension = parts.extension;

        let classifier = match parts.tail {
            FilenameTail::Bare => None,
            FilenameTail::Classifier(classifier) => Some(classifier),
            FilenameTail::CompoundExtension(prefix) => {
                return Err(LayoutError::invalid(
                    path,
                    format!("extension '{}.{}' is not an artifact type", prefix, extension),
                ));
            }
        };

        let artifact_type = match expected_type {
            Some(artifact_type) => {
                if artifact_type::extension_for_type(&artifact_type) != extension {
                    return Err(LayoutError::invalid(
                        path,
                        format!("extension '{}' does not match directory '{}'", extension, directory),
                    ));
                }
                artifact_type
            }
            None => artifact_type::for_extension(&extension),
        };

        Ok(ArtifactReference::new(
            group_id.as_str(),
            parts.artifact_id,
            parts.version,
            classifier,
            artifact_type,
        ))
    }

    fn to_path(&self, artifact: &ArtifactReference) -> String {
        let mut path = format!(
            "{}/{}/{}-{}",
            artifact.group_id,
            type_directory(&artifact.artifact_type),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(path: &str) -> ArtifactReference {
        let artifact = LegacyLayout.to_artifact_reference(path).unwrap();
        assert_eq!(LegacyLayout.to_path(&artifact), path);
        artifact
    }

    #[test]
    fn test_jar_and_pom() {
        let artifact = round_trip("commons-lang/jars/commons-lang-2.1.jar");
        assert_eq!(artifact.group_id, "commons-lang");
        assert_eq!(artifact.artifact_id, "commons-lang");
        assert_eq!(artifact.version, "2.1");
        assert_eq!(artifact.artifact_type, "jar");

        let artifact = round_trip("org.apache.derby/poms/derby-10.2.2.0-SNAPSHOT.pom");
        assert_eq!(artifact.group_id, "org.apache.derby");
        assert_eq!(artifact.version, "10.2.2.0-SNAPSHOT");
        assert_eq!(artifact.artifact_type, "pom");
    }

    #[test]
    fn test_special_directories() {
        let artifact = round_trip("maven/plugins/maven-test-plugin-1.8.2.jar");
        assert_eq!(artifact.artifact_type, "maven-plugin");

        let artifact = round_trip("org.apache.maven/java-sources/maven-model-2.0-sources.jar");
        assert_eq!(artifact.artifact_type, "java-source");
        assert_eq!(artifact.classifier.as_deref(), Some("sources"));

        let artifact = round_trip("commons-lang/distributions/commons-lang-2.1.tar.gz");
        assert_eq!(artifact.artifact_type, "distribution-tgz");
    }

    #[test]
    fn test_invalid_legacy_paths() {
        assert!(LegacyLayout
            .to_artifact_reference("org/example/lib/1.0/lib-1.0.jar")
            .is_err());
        assert!(LegacyLayout
            .to_artifact_reference("commons-lang/jars/commons-lang-2.1.pom")
            .is_err());
        assert!(LegacyLayout
            .to_artifact_reference("commons-lang/jars/commons-lang-2.1.jar.md5")
            .is_err());
        assert!(LegacyLayout
            .to_artifact_reference("commons-lang/jars/commons-lang.jar")
            .is_err());
        assert!(!LegacyLayout.has_version_directories());
    }
}
