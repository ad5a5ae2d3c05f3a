//! KDL configuration parsing for Archiva.
//!
//! This crate handles parsing of:
//! - Managed repository definitions (location, layout, purge policy)
//! - The artifact database connection

pub mod error;
pub mod repository;

pub use error::{ConfigError, ConfigResult};
pub use repository::{ArchivaConfig, ManagedRepository, load_config, parse_config};
