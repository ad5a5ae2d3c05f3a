//! Artifact, version and project coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::version;

/// A project: every version of one artifactId within a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReference {
    pub group_id: String,
    pub artifact_id: String,
}

impl ProjectReference {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for ProjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// One version of a project, without classifier or type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedReference {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl VersionedReference {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    pub fn project(&self) -> ProjectReference {
        ProjectReference::new(&self.group_id, &self.artifact_id)
    }
}

impl fmt::Display for VersionedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A fully-qualified artifact coordinate, as derived from a repository path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactReference {
    pub group_id: String,
    pub artifact_id: String,
    /// Concrete version; for unique snapshots this carries the build timestamp.
    pub version: String,
    pub classifier: Option<String>,
    #[serde(rename = "type")]
    pub artifact_type: String,
}

impl ArtifactReference {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        classifier: Option<String>,
        artifact_type: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: classifier.filter(|c| !c.is_empty()),
            artifact_type: artifact_type.into(),
        }
    }

    /// The version with any unique-snapshot suffix collapsed to `-SNAPSHOT`.
    pub fn base_version(&self) -> String {
        version::base_version(&self.version)
    }

    pub fn is_snapshot(&self) -> bool {
        version::is_snapshot(&self.version)
    }

    /// True when both coordinates name the same group, artifact and base version.
    pub fn same_unique_version(&self, other: &ArtifactReference) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.base_version() == other.base_version()
    }

    pub fn project(&self) -> ProjectReference {
        ProjectReference::new(&self.group_id, &self.artifact_id)
    }

    pub fn versioned(&self) -> VersionedReference {
        VersionedReference::new(&self.group_id, &self.artifact_id, self.base_version())
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.artifact_type)
    }
}
