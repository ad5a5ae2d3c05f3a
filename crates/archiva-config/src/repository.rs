//! Managed repository configuration parsing.

use crate::{ConfigError, ConfigResult};
use archiva_core::{LayoutKind, RepositoryLayout};
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_RETENTION_COUNT: u32 = 2;
pub const DEFAULT_DAYS_OLDER: u32 = 100;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchivaConfig {
    /// Connection string of the artifact database.
    pub database_url: Option<String>,
    pub repositories: Vec<ManagedRepository>,
}

impl ArchivaConfig {
    pub fn repository(&self, id: &str) -> Option<&ManagedRepository> {
        self.repositories.iter().find(|r| r.id == id)
    }
}

/// A repository whose content Archiva owns and maintains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedRepository {
    pub id: String,
    pub name: String,
    /// Root directory of the repository on disk.
    pub location: PathBuf,
    pub layout: LayoutKind,
    /// Number of snapshot builds kept per version.
    pub retention_count: u32,
    /// Age in days after which snapshot builds are purged; 0 disables.
    pub days_older: u32,
    /// Remove snapshot versions once a newer version has been released.
    pub delete_released_snapshots: bool,
}

impl ManagedRepository {
    pub fn new(id: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            location: location.into(),
            layout: LayoutKind::Default,
            retention_count: DEFAULT_RETENTION_COUNT,
            days_older: DEFAULT_DAYS_OLDER,
            delete_released_snapshots: false,
        }
    }

    pub fn layout(&self) -> Arc<dyn RepositoryLayout> {
        self.layout.layout()
    }
}

/// Parse configuration from KDL text.
pub fn parse_config(kdl: &str) -> ConfigResult<ArchivaConfig> {
    let doc: KdlDocument = kdl.parse()?;

    let mut config = ArchivaConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "database" => {
                config.database_url = Some(
                    get_first_string_arg(node)
                        .ok_or_else(|| ConfigError::MissingField("database url".to_string()))?,
                );
            }
            "repository" => {
                let repository = parse_repository(node)?;
                if config.repository(&repository.id).is_some() {
                    return Err(ConfigError::Duplicate(format!(
                        "repository '{}'",
                        repository.id
                    )));
                }
                config.repositories.push(repository);
            }
            other => debug!(node = other, "ignoring unknown configuration node"),
        }
    }

    Ok(config)
}

/// Read and parse a configuration file.
///
/// Relative repository locations are resolved against the directory holding
/// the file.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<ArchivaConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mut config = parse_config(&text)?;

    if let Some(base) = path.parent() {
        for repository in &mut config.repositories {
            if repository.location.is_relative() {
                repository.location = base.join(&repository.location);
            }
        }
    }

    Ok(config)
}

fn parse_repository(node: &KdlNode) -> ConfigResult<ManagedRepository> {
    let id = get_first_string_arg(node)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField("repository id".to_string()))?;

    let mut name = None;
    let mut location = None;
    let mut layout = LayoutKind::Default;
    let mut retention_count = DEFAULT_RETENTION_COUNT;
    let mut days_older = DEFAULT_DAYS_OLDER;
    let mut delete_released_snapshots = false;

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "name" => {
                    name = get_first_string_arg(child);
                }
                "location" => {
                    location = get_first_string_arg(child).map(PathBuf::from);
                }
                "layout" => {
                    let value = get_first_string_arg(child).unwrap_or_default();
                    layout = value.parse().map_err(|_| ConfigError::InvalidValue {
                        field: format!("layout of repository '{}'", id),
                        message: format!("unknown layout '{}'", value),
                    })?;
                }
                "retention-count" => {
                    retention_count = get_count_arg(child, &id)?;
                    if retention_count == 0 {
                        return Err(ConfigError::InvalidValue {
                            field: format!("retention-count of repository '{}'", id),
                            message: "must be at least 1".to_string(),
                        });
                    }
                }
                "days-older" => {
                    days_older = get_count_arg(child, &id)?;
                }
                "delete-released-snapshots" => {
                    delete_released_snapshots =
                        get_first_bool_arg(child).ok_or_else(|| ConfigError::InvalidValue {
                            field: format!("delete-released-snapshots of repository '{}'", id),
                            message: "expected a boolean".to_string(),
                        })?;
                }
                other => debug!(repository = %id, node = other, "ignoring unknown repository setting"),
            }
        }
    }

    let location = location
        .filter(|l| !l.as_os_str().is_empty())
        .ok_or_else(|| ConfigError::MissingField(format!("location of repository '{}'", id)))?;

    Ok(ManagedRepository {
        name: name.unwrap_or_else(|| id.clone()),
        id,
        location,
        layout,
        retention_count,
        days_older,
        delete_released_snapshots,
    })
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_first_bool_arg(node: &KdlNode) -> Option<bool> {
    let value = node.entries().iter().find(|e| e.name().is_none())?.value();
    value.as_bool().or_else(|| match value.as_string()? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    })
}

fn get_count_arg(node: &KdlNode, repository: &str) -> ConfigResult<u32> {
    let field = node.name().value();
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_integer())
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ConfigError::InvalidValue {
            field: format!("{} of repository '{}'", field, repository),
            message: "expected a non-negative integer".to_string(),
        })
}
