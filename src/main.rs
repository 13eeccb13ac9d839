//! Sismo server binary
//!
//! # Usage
//!
//! ```bash
//! # Run with the default config (CSV catalog if present, synthetic otherwise)
//! cargo run --release
//!
//! # Run against a specific catalog file
//! cargo run --release -- --data data/earthquakes.csv
//!
//! # Override the bind address
//! cargo run --release -- --addr 127.0.0.1:9000
//! ```
//!
//! # Environment Variables
//!
//! - `SISMO_CONFIG`: Path to a TOML config file
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sismo::api::{create_app, ApiState};
use sismo::catalog::{sample, ObservationStore};
use sismo::config::{self, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "sismo")]
#[command(about = "Earthquake observation analytics and forecasting for the Philippines")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides SISMO_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address (default from config, "0.0.0.0:8000")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a CSV observation catalog (overrides the configured path)
    #[arg(long)]
    data: Option<PathBuf>,
}

/// Load the catalog from disk, falling back to a synthetic set.
fn build_store(cfg: &ServiceConfig, override_path: Option<&Path>) -> Result<ObservationStore> {
    let path = override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.catalog.data_path));

    if path.exists() {
        let store = ObservationStore::from_csv(&path)
            .with_context(|| format!("loading catalog from {}", path.display()))?;
        info!(count = store.len(), path = %path.display(), "observation catalog ready");
        return Ok(store);
    }

    warn!(
        path = %path.display(),
        count = cfg.catalog.sample_size,
        "catalog file not found, generating synthetic observations"
    );
    let observations = sample::generate(cfg.catalog.sample_size, cfg.catalog.sample_seed);
    ObservationStore::with_observations(observations).context("building synthetic catalog")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    let cfg = ServiceConfig::load(args.config.as_deref()).context("loading configuration")?;
    config::init(cfg);
    let cfg = config::get();

    let store = Arc::new(build_store(cfg, args.data.as_deref())?);

    let addr = args
        .addr
        .unwrap_or_else(|| format!("{}:{}", cfg.server.host, cfg.server.port));
    let app = create_app(ApiState::new(store));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "sismo listening");

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
