//! Purge command.

use anyhow::{Context, Result, bail};
use archiva_config::ArchivaConfig;
use archiva_db::{ArtifactDao, MemoryArtifactDao, PgArtifactDao};
use archiva_purge::{RepositoryPurgeConsumer, RepositoryScanner, ScanStatistics};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(
    config_path: &Path,
    repositories: &[String],
    database_url: Option<String>,
    json: bool,
) -> Result<()> {
    let config = archiva_config::load_config(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let selected = select_repositories(&config, repositories)?;
    let dao = connect(database_url.or_else(|| config.database_url.clone())).await?;

    let mut results: Vec<ScanStatistics> = Vec::new();
    for repository in selected {
        let scanner = RepositoryScanner::new(repository);
        let mut consumer = RepositoryPurgeConsumer::new(repository.clone(), dao.clone())?;
        let stats = scanner
            .scan(&mut consumer)
            .await
            .with_context(|| format!("failed to scan repository '{}'", repository.id))?;
        results.push(stats);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for stats in &results {
            println!(
                "{}: {} files visited, {} processed, {} failed in {:.2}s",
                stats.repository_id,
                stats.files_visited,
                stats.files_processed,
                stats.files_failed,
                stats.duration.as_secs_f64()
            );
        }
    }
    Ok(())
}

fn select_repositories<'a>(
    config: &'a ArchivaConfig,
    ids: &[String],
) -> Result<Vec<&'a archiva_config::ManagedRepository>> {
    if ids.is_empty() {
        return Ok(config.repositories.iter().collect());
    }
    ids.iter()
        .map(|id| match config.repository(id) {
            Some(repository) => Ok(repository),
            None => bail!("unknown repository '{}'", id),
        })
        .collect()
}

async fn connect(database_url: Option<String>) -> Result<Arc<dyn ArtifactDao>> {
    match database_url {
        Some(url) => {
            let pool = archiva_db::create_pool(&url).await?;
            archiva_db::run_migrations(&pool).await?;
            info!("Connected to artifact database");
            Ok(Arc::new(PgArtifactDao::new(pool)))
        }
        None => {
            warn!("No artifact database configured, artifact records will not be updated");
            Ok(Arc::new(MemoryArtifactDao::new()))
        }
    }
}
