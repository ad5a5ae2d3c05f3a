//! Purge errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("layout error: {0}")]
    Layout(#[from] archiva_core::LayoutError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] archiva_core::MetadataError),

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type PurgeResult<T> = std::result::Result<T, PurgeError>;
