//! NVR Metadata Server
//!
//! A read-only HTTP endpoint over the `.meta` sidecar files the NVR recorder
//! writes next to each finished recording. Every query rescans the metadata
//! directory, filters by time range and device, and answers with the
//! recordings grouped by timestamp, device and stream type.

#![allow(dead_code)]

mod config;
mod config_file;
mod error;
mod http;
mod index;
#[cfg(test)]
mod integration;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::error::{IndexError, Result};
use crate::http::create_router;
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "nvr-meta-server";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration, logging needs its level
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let loaded = read_config(&config_path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => ServerConfig::default(),
    };

    // Initialize logging
    init_logging(&config.log_level);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Err(e) = &loaded {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }
    tracing::info!("Configuration loaded: {:?}", config);

    if !config.index.meta_dir.is_dir() {
        tracing::warn!(
            "Metadata directory {:?} does not exist yet; queries will report it missing",
            config.index.meta_dir
        );
    }

    // Create application state
    let state = Arc::new(AppState::new(config.clone()));

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .map_err(|e| IndexError::Config(format!("Invalid listen address: {}", e)))?;
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read the config file; `Ok(None)` when there is no file
fn read_config(
    config_path: &str,
) -> std::result::Result<Option<ServerConfig>, Box<dyn std::error::Error>> {
    if !std::path::Path::new(config_path).exists() {
        return Ok(None);
    }
    let config = crate::config_file::ConfigFile::from_file(config_path)?;
    Ok(Some(config.into_server_config()))
}

/// Initialize logging with tracing
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("nvr_meta_server={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
