//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use pixpress_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    pixpress_infra::init_telemetry(config.log_format, "pixpress", &config.environment)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    if !config.index_path().is_file() {
        tracing::warn!(
            path = %config.index_path().display(),
            "Landing page not found; GET / will answer 404"
        );
    }

    let state = Arc::new(AppState::new(config.clone()));
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
