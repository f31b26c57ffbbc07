//! Tasklog Worker
//!
//! The log server embedded in a worker node. Other nodes cannot read the
//! worker's filesystem, so they send commands asking it to view, page
//! through, download or remove task logs, or to extract application ids.
//!
//! Architecture:
//! - Configuration: Log root, listen address and pool size from environment
//! - Services: Path guard and the file readers, remover and id extractor
//! - Processor: Decodes a command, calls one service, writes the response
//! - Server: TCP accept loop feeding commands to the processor

mod channel;
mod config;
mod error;
mod processor;
mod server;
mod service;

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::processor::LogRequestProcessor;
use crate::server::LogServer;
use crate::service::PathGuard;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklog_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tasklog Worker");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: log_root={}, bind_addr={}, worker_threads={}",
        config.log_root.display(),
        config.bind_addr,
        config.worker_threads
    );

    let path_guard = PathGuard::new(config.log_root.clone());
    info!("Serving task logs under {}", path_guard.log_root().display());

    let processor = Arc::new(LogRequestProcessor::new(path_guard));
    let server = LogServer::new(config, processor);

    if let Err(e) = server.run(shutdown_signal()).await {
        error!("Log server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Loads configuration from environment variables and validates it
fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

/// Resolves when the process receives Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
