//! Persisted shadow of an artifact file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ArtifactReference, RecordId};

/// Origin recorded for artifacts discovered by a repository scan.
pub const ORIGIN_SCAN: &str = "scan";

/// Database record for one artifact file in a managed repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub id: RecordId,
    pub repository_id: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub artifact_type: String,
    /// Modification time of the file when it was gathered.
    pub last_modified: DateTime<Utc>,
    pub origin: String,
    pub when_gathered: DateTime<Utc>,
}

impl ArtifactRecord {
    pub fn new(
        repository_id: impl Into<String>,
        artifact: &ArtifactReference,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            repository_id: repository_id.into(),
            group_id: artifact.group_id.clone(),
            artifact_id: artifact.artifact_id.clone(),
            version: artifact.version.clone(),
            classifier: artifact.classifier.clone(),
            artifact_type: artifact.artifact_type.clone(),
            last_modified,
            origin: ORIGIN_SCAN.to_string(),
            when_gathered: Utc::now(),
        }
    }

    pub fn reference(&self) -> ArtifactReference {
        ArtifactReference::new(
            self.group_id.as_str(),
            self.artifact_id.as_str(),
            self.version.as_str(),
            self.classifier.clone(),
            self.artifact_type.as_str(),
        )
    }

    /// True if the record describes `artifact` in `repository_id`.
    pub fn matches(&self, repository_id: &str, artifact: &ArtifactReference) -> bool {
        self.repository_id == repository_id
            && self.group_id == artifact.group_id
            && self.artifact_id == artifact.artifact_id
            && self.version == artifact.version
            && self.classifier == artifact.classifier
            && self.artifact_type == artifact.artifact_type
    }
}
