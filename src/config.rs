// src/config.rs

//! Manages server configuration: defaults and loading from a TOML file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// The server's startup configuration.
///
/// Every field has a compiled-in default, so a partial (or absent) config
/// file is always valid.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// The interface the listener binds to.
    #[serde(default = "default_host")]
    pub host: String,
    /// The TCP port the listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The default log filter, overridable with `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Upper bound on concurrently connected clients.
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_clients: default_max_clients(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        Ok(config)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1234
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_clients() -> usize {
    10_000
}
