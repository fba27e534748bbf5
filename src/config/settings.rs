//! Application settings loading from config.toml
//!
//! Settings come from an optional TOML file and can be overridden by
//! environment variables (`DATABASE_URL`, `BIND_ADDR`). Every field has a
//! default, so a missing config file is not an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/retail_ops.sqlite?mode=rwc";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Database settings
    pub database: DatabaseConfig,
}

/// HTTP server settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind to
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// The `host:port` pair the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL understood by `SeaORM`
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(Into::into)
}

/// Loads settings from `./config.toml` (if present) and applies
/// environment overrides.
///
/// # Errors
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = Path::new(DEFAULT_CONFIG_PATH);
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        tracing::info!("No {DEFAULT_CONFIG_PATH} found, using default settings");
        AppConfig::default()
    };

    apply_env_overrides(
        &mut config,
        std::env::var("DATABASE_URL").ok(),
        std::env::var("BIND_ADDR").ok(),
    )?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut AppConfig,
    database_url: Option<String>,
    bind_addr: Option<String>,
) -> Result<()> {
    if let Some(url) = database_url {
        config.database.url = url;
    }

    if let Some(addr) = bind_addr {
        let (host, port) = addr.rsplit_once(':').ok_or_else(|| Error::Config {
            message: format!("BIND_ADDR must be host:port, got '{addr}'"),
        })?;
        config.server.port = port.parse().map_err(|e| Error::Config {
            message: format!("Invalid port in BIND_ADDR '{addr}': {e}"),
        })?;
        config.server.host = host.to_string();
    }

    Ok(())
}
