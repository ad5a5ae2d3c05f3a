//! CLI command implementations.

pub mod purge;

use anyhow::Result;
use archiva_core::{DefaultLayout, LayoutKind};
use std::path::Path;

pub fn validate(path: &Path, json: bool) -> Result<()> {
    match archiva_config::load_config(path) {
        Ok(config) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            println!("Configuration is valid");
            for repo in &config.repositories {
                println!(
                    "  {} ({}) at {}: layout {}, retention {}, days older {}, delete released snapshots {}",
                    repo.id,
                    repo.name,
                    repo.location.display(),
                    repo.layout,
                    repo.retention_count,
                    repo.days_older,
                    repo.delete_released_snapshots
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn resolve(path: &str, layout: LayoutKind, json: bool) -> Result<()> {
    let kind = layout;
    let layout = kind.layout();
    let artifact = layout.to_artifact_reference(path)?;
    let metadata = match kind {
        LayoutKind::Default => Some((
            DefaultLayout.to_project_metadata_path(&artifact.project()),
            DefaultLayout.to_version_metadata_path(&artifact.versioned()),
        )),
        LayoutKind::Legacy => None,
    };

    if json {
        let (project_metadata, version_metadata) = metadata.unzip();
        let output = serde_json::json!({
            "artifact": artifact,
            "path": layout.to_path(&artifact),
            "project_metadata": project_metadata,
            "version_metadata": version_metadata,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", artifact);
        println!("  base version: {}", artifact.base_version());
        println!("  snapshot:     {}", artifact.is_snapshot());
        println!("  path:         {}", layout.to_path(&artifact));
        if let Some((project_metadata, version_metadata)) = metadata {
            println!("  metadata:     {}", project_metadata);
            println!("                {}", version_metadata);
        }
    }
    Ok(())
}
