//! # apispec-server
//!
//! HTTP server for apispec.
//!
//! This binary provides:
//! - The generated specification document as JSON
//! - Regeneration from the inventory on disk
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! cargo run --package apispec-server
//!
//! # Custom configuration
//! APISPEC_CONFIG=./apispec.toml ./apispec-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::path::PathBuf;

use apispec_core::Config;
use apispec_server::api::create_router;
use apispec_server::logging;
use apispec_server::state::AppState;
use tokio::net::TcpListener;
use tracing::info;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "APISPEC_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(Config::default_path, PathBuf::from);
    let config = Config::load_or_default(&config_path)?;

    logging::init(config.server.production)?;

    info!(config = %config_path.display(), "Starting apispec-server");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::load(config)?.shared();
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
