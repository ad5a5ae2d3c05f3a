//! Artifact DAO trait and implementations.

pub mod artifact;
pub mod memory;

pub use artifact::{ArtifactDao, ArtifactRow, PgArtifactDao};
pub use memory::MemoryArtifactDao;
