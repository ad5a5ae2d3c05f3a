//! Repository layouts: translation between paths and artifact coordinates.

mod default;
mod legacy;

pub use default::DefaultLayout;
pub use legacy::LegacyLayout;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ArtifactReference, Error, LayoutResult};

pub const METADATA_FILENAME: &str = "maven-metadata.xml";

/// Translates repository-relative paths to artifact coordinates and back.
///
/// For every valid artifact path `p`,
/// `to_path(&to_artifact_reference(p)?)` names the same file as `p`.
pub trait RepositoryLayout: Send + Sync {
    fn kind(&self) -> LayoutKind;

    fn to_artifact_reference(&self, path: &str) -> LayoutResult<ArtifactReference>;

    fn to_path(&self, artifact: &ArtifactReference) -> String;

    /// Whether each base version gets its own directory.
    fn has_version_directories(&self) -> bool {
        self.kind() == LayoutKind::Default
    }
}

/// Layout convention of a managed repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Default,
    Legacy,
}

impl LayoutKind {
    pub fn layout(self) -> Arc<dyn RepositoryLayout> {
        match self {
            LayoutKind::Default => Arc::new(DefaultLayout),
            LayoutKind::Legacy => Arc::new(LegacyLayout),
        }
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutKind::Default => write!(f, "default"),
            LayoutKind::Legacy => write!(f, "legacy"),
        }
    }
}

impl std::str::FromStr for LayoutKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "maven2" => Ok(LayoutKind::Default),
            "legacy" | "maven1" => Ok(LayoutKind::Legacy),
            _ => Err(Error::InvalidInput(format!("unknown repository layout: {}", s))),
        }
    }
}

/// Split a path into its non-empty segments, accepting `\` as a separator.
fn path_segments(path: &str) -> Vec<String> {
    path.replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// True for `maven-metadata.xml` and per-repository variants such as
/// `maven-metadata-central.xml`.
pub fn is_metadata_file(filename: &str) -> bool {
    filename.starts_with("maven-metadata") && filename.ends_with(".xml")
}
