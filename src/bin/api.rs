//! Obesity Data API Server
//!
//! Run with: cargo run --bin obesity-api
//!
//! # Configuration
//!
//! Read from the first config file found (see `Config::load_default`), or the
//! path in `OBESITY_CONFIG`. Environment variables override it:
//! - `OBESITY_DATASET_PATH`: CSV file to serve (default: data/obesity_data.csv)
//! - `OBESITY_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `OBESITY_API_PORT`: Port to listen on (default: 8000)
//! - `OBESITY_LOG_LEVEL` / `OBESITY_LOG_FORMAT`: info, pretty
//! - `RUST_LOG`: overrides the log level entirely

use anyhow::Context;
use obesity_dash::api::{serve, AppState};
use obesity_dash::config::Config;
use obesity_dash::dataset::Dataset;
use obesity_dash::logging;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A config file that exists but does not parse stops startup here
    let (config, source) = match std::env::var("OBESITY_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            (Config::load_with_env(&path)?, Some(path))
        }
        Err(_) => Config::load_default()?,
    };

    logging::init(&config.logging).context("failed to initialize logging")?;
    log_config_source(source.as_deref());

    tracing::info!("Starting Obesity Data API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dataset: {:?}", config.dataset.path);

    // A dataset that cannot be read is fatal; never bind the port without one
    let dataset = match Dataset::load(&config.dataset.path) {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::error!(error = %e, path = ?config.dataset.path, "Failed to load dataset");
            return Err(e).with_context(|| {
                format!("cannot load dataset from {}", config.dataset.path.display())
            });
        }
    };

    if dataset.is_empty() {
        tracing::warn!("Dataset has no usable rows; /statistics will report errors");
    }

    let state = AppState::new(Arc::new(dataset), config.api.clone());

    serve(state, &config.api).await?;
    Ok(())
}

fn log_config_source(source: Option<&Path>) {
    match source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
}
