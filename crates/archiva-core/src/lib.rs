//! Core domain types for the Archiva repository manager.
//!
//! This crate contains:
//! - Artifact, project and version coordinates
//! - Version classification and Maven version ordering
//! - Filename lexing for repository artifact files
//! - Repository layouts (Maven 2 default, Maven 1 legacy)
//! - `maven-metadata.xml` reading and writing
//! - Checksum side-file helpers
//! - The artifact record persisted for every repository file

pub mod artifact_type;
pub mod checksum;
pub mod coordinate;
pub mod error;
pub mod filename;
pub mod id;
pub mod layout;
pub mod metadata;
pub mod record;
pub mod version;

pub use coordinate::{ArtifactReference, ProjectReference, VersionedReference};
pub use error::{Error, LayoutError, LayoutResult, MetadataError, Result};
pub use id::RecordId;
pub use layout::{DefaultLayout, LayoutKind, LegacyLayout, RepositoryLayout};
pub use metadata::RepositoryMetadata;
pub use record::ArtifactRecord;
