//! psview CLI - Show local processes with their service URL and source path
//!
//! Lists processes whose command line matches a pattern (node by default),
//! with the URL each one appears to serve and the script it is running.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use psview_core::{ConfigStore, NameFilter, ScanOptions};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "psview")]
#[command(author, version, about = "Show local processes with their service URL and source path")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Only show processes whose command line contains this pattern
    /// (case-insensitive, default from config: "node")
    #[arg(short, long)]
    pattern: Option<String>,

    /// Show all processes
    #[arg(short, long, conflicts_with = "pattern")]
    all: bool,

    /// Only show processes with a URL
    #[arg(short, long)]
    url: bool,

    /// Maximum number of concurrent socket lookups
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Config,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        "psview=debug,psview_core=debug"
    } else {
        "psview=warn,psview_core=warn"
    };

    // Logs go to stderr so JSON on stdout stays parseable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let store = ConfigStore::new()?;
    let mut config = store
        .load()
        .await
        .with_context(|| format!("Failed to load {}", store.path().display()))?;
    tracing::debug!(path = %store.path().display(), ?config, "configuration loaded");

    if let Some(concurrency) = cli.concurrency {
        config.lookup_concurrency = concurrency;
    }

    match cli.command {
        Some(Commands::Config) => {
            commands::config::show(&config, store.path(), cli.json)?;
        }
        None => {
            let filter = if cli.all {
                NameFilter::All
            } else {
                NameFilter::pattern(cli.pattern.unwrap_or_else(|| config.default_pattern.clone()))
            };
            let options = ScanOptions {
                filter,
                url_only: cli.url,
            };
            commands::list::run(&options, &config, cli.json).await?;
        }
    }

    Ok(())
}
