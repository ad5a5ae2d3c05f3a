//! Archiva CLI tool.

use archiva_core::LayoutKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "archiva")]
#[command(about = "Archiva repository maintenance", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, env = "ARCHIVA_CONFIG", default_value = "archiva.kdl")]
    config: PathBuf,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "ARCHIVA_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Purge old snapshots from managed repositories
    Purge {
        /// Repository IDs to purge (all when omitted)
        repositories: Vec<String>,
        /// Artifact database URL, overriding the configuration file
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
    /// Validate a configuration file
    Validate,
    /// Resolve a repository path to its artifact coordinate
    Resolve {
        /// Path relative to the repository root
        path: String,
        /// Repository layout
        #[arg(long, default_value = "default")]
        layout: LayoutKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Purge {
            repositories,
            database_url,
        } => {
            commands::purge::run(&cli.config, &repositories, database_url, cli.json).await?;
        }
        Commands::Validate => {
            commands::validate(&cli.config, cli.json)?;
        }
        Commands::Resolve { path, layout } => {
            commands::resolve(&path, layout, cli.json)?;
        }
    }

    Ok(())
}
