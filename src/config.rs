//! Configuration loading for the clientgate service.
//!
//! A TOML file with per-field defaults; every field is optional so an empty
//! file (or no file at all) yields a working local configuration. CLI flags
//! override file values in `main`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
}

/// HTTP gateway bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3100,
        }
    }
}

/// Account store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Path to the SQLite database holding the accounts table.
    pub db_path: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("clientgate.db"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no path given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}
