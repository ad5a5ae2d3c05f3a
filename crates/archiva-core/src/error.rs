//! Error types for Archiva core.

use thiserror::Error;

/// A path or filename that cannot be interpreted under a repository layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unable to convert blank path")]
    BlankPath,

    #[error("not enough parts to the path [{path}] to construct an artifact reference (requires {required})")]
    TooFewSegments { path: String, required: usize },

    #[error("invalid artifact [{path}]: {message}")]
    InvalidArtifact { path: String, message: String },

    #[error("invalid snapshot artifact location [{path}], version directory should be {expected}")]
    SnapshotLocation { path: String, expected: String },

    #[error("invalid metadata path [{path}]: {message}")]
    InvalidMetadataPath { path: String, message: String },
}

impl LayoutError {
    pub(crate) fn invalid(path: &str, message: impl Into<String>) -> Self {
        LayoutError::InvalidArtifact {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// Failure reading or writing a `maven-metadata.xml` descriptor.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("unable to parse maven-metadata.xml: {0}")]
    Parse(String),

    #[error("unable to write maven-metadata.xml: {0}")]
    Serialize(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
