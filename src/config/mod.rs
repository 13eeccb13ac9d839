//! Service configuration
//!
//! TOML-backed settings with a process-global accessor.
//!
//! ## Loading Order
//!
//! 1. Explicit path (`--config` flag)
//! 2. `SISMO_CONFIG` environment variable (path to TOML file)
//! 3. `sismo.toml` in the current working directory
//! 4. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Global service configuration, initialized once at startup.
static SERVICE_CONFIG: OnceLock<ServiceConfig> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API cross-origin. Empty list means
    /// same-origin only.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// CSV catalog location. When the file is missing, a seeded synthetic
    /// catalog of `sample_size` observations is generated instead.
    pub data_path: String,
    pub sample_size: usize,
    pub sample_seed: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_path: "data/earthquakes.csv".to_string(),
            sample_size: 1000,
            sample_seed: crate::catalog::sample::DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub catalog: CatalogConfig,
}

impl ServiceConfig {
    /// Parse a specific TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolve configuration from the standard load order.
    ///
    /// An explicitly named file (argument or `SISMO_CONFIG`) that fails to
    /// load is an error; a missing `sismo.toml` in the working directory
    /// silently falls back to defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var("SISMO_CONFIG") {
            return Self::from_file(Path::new(&path));
        }
        let default_path = Path::new("sismo.toml");
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        tracing::debug!("no config file found, using built-in defaults");
        Ok(Self::default())
    }
}

/// Initialize the global configuration.
///
/// Later calls are ignored with a warning, so tests can initialize freely.
pub fn init(config: ServiceConfig) {
    if SERVICE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Panics if `init()` has not been called. A missing config is a fatal
/// startup error, not a recoverable condition.
pub fn get() -> &'static ServiceConfig {
    SERVICE_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    SERVICE_CONFIG.get().is_some()
}
