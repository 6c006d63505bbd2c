//! Fetch Figma files and import them into the local database.
//!
//! Usage:
//!   figma_sync --figma-token <TOKEN> [--db-path figma-store.db] <KEY>...
//!
//! Re-running for the same key refreshes the file and replaces its nodes.

use clap::Parser;
use figma_store::config::{ensure_db_dir, sqlite_url, DEFAULT_FIGMA_API_URL};
use figma_store::error::Result;
use figma_store::figma::{document, FigmaClient, FigmaStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "figma_sync")]
#[command(about = "Fetch Figma files and import them into the local database")]
struct Args {
    /// Figma personal access token
    #[arg(long, env = "FIGMA_TOKEN")]
    figma_token: String,

    /// Base URL of the Figma REST API
    #[arg(long, env = "FIGMA_API_URL", default_value = DEFAULT_FIGMA_API_URL)]
    figma_api_url: String,

    /// Path to the SQLite database file
    #[arg(long, env = "DB_PATH", default_value = "figma-store.db")]
    db_path: String,

    /// Print what was fetched without writing to the database
    #[arg(long, default_value = "false")]
    dry_run: bool,

    /// File keys to sync
    #[arg(required = true)]
    keys: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let client = FigmaClient::new(args.figma_token.clone(), args.figma_api_url.clone())?;

    let store = if args.dry_run {
        tracing::info!("DRY RUN mode - no changes will be made");
        None
    } else {
        ensure_db_dir(&args.db_path)?;
        Some(FigmaStore::connect(&sqlite_url(&args.db_path)).await?)
    };

    let verb = if args.dry_run { "Previewed" } else { "Synced" };
    let mut failed = 0;
    for key in &args.keys {
        let result = match &store {
            Some(store) => store
                .sync_file(&client, key)
                .await
                .map(|(file, nodes)| (file.key, file.name, nodes.len())),
            None => preview(&client, key).await,
        };

        match result {
            Ok((key, name, nodes)) => {
                tracing::info!("{} '{}' ({}): {} nodes", verb, key, name, nodes);
            }
            Err(e) => {
                tracing::error!("Failed to sync '{}': {}", key, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files failed to sync", failed, args.keys.len());
    }
    tracing::info!("{} {} files", verb, args.keys.len());
    Ok(())
}

/// Fetch and flatten a file without storing it.
async fn preview(client: &FigmaClient, key: &str) -> Result<(String, String, usize)> {
    let doc = client.fetch_file(key).await?;
    let attrs = document::file_attributes(key, &doc)?;
    Ok((attrs.key, attrs.name, attrs.nodes.len()))
}
