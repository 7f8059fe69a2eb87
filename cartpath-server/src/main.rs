use std::{error::Error, path::PathBuf, sync::Arc, time::Duration};

use cartpath_core::{create_store_graph, default_sections, load_sections_from_path};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod state;

use config::ServerConfig;
use state::{AppState, spawn_crowd_refresh};

/// In-store navigation service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on, overrides the configuration
    #[arg(long)]
    bind: Option<String>,
    /// Store layout JSON, overrides the configuration
    #[arg(long)]
    layout: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_path(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(layout) = cli.layout {
        config.store.layout_path = Some(layout);
    }

    let sections = match &config.store.layout_path {
        Some(path) => {
            info!("Loading store layout from {}", path.display());
            load_sections_from_path(path)?
        }
        None => default_sections(),
    };
    let graph = create_store_graph(sections, &config.store.graph)?;

    let state = Arc::new(AppState::new(graph, config.route.clone()));
    let refresher = spawn_crowd_refresh(
        state.clone(),
        Duration::from_secs(config.crowd.refresh_secs),
    );

    let app = api::build_router(state, &config.server);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("Navigation service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresher.abort();
    info!("Navigation service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
    }
}
