//! REST service storing Figma files and their nodes.

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use figma_store::api::create_router;
use figma_store::config::{ensure_db_dir, Config};
use figma_store::figma::{FigmaClient, FigmaStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting figma-store");
    tracing::info!("Database path: {}", config.db_path);

    ensure_db_dir(&config.db_path)?;
    let store = FigmaStore::connect(&config.database_url()).await?;

    let figma = match config.figma_token.clone() {
        Some(token) => {
            tracing::info!("Figma sync enabled ({})", config.figma_api_url);
            Some(FigmaClient::new(token, config.figma_api_url.clone())?)
        }
        None => {
            tracing::warn!("FIGMA_TOKEN not set, sync endpoint disabled");
            None
        }
    };

    let app = create_router(store, figma).layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
