mod api;
mod args;
mod error;

use anyhow::Context;
use api::AppState;
use args::Cli;
use clap::Parser;
use log::{error, info};
use std::sync::Arc;
use swarm_gateway::{DockerGateway, StatusClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    info!("=== Swarm Status Backend Starting ===");

    // 1. Control plane access
    let config = cli.gateway.to_config();
    info!("Using Docker Engine at {}", config.host());
    let gateway =
        DockerGateway::connect(&config).context("Failed to configure the Docker gateway")?;
    let state = AppState::new(StatusClient::new(Arc::new(gateway)));

    // 2. Routes
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    info!("Swarm Status Backend listening on {}", cli.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("=== Swarm Status Backend Stopped ===");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for the shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
