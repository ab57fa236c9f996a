//! Server settings
//!
//! Built-in defaults, then an optional config file, then `STARTUP_*`
//! environment variables (e.g. `STARTUP_BIND_ADDRESS=127.0.0.1:9000`).

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use startup_types::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "STARTUP";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_DATABASE_PATH: &str = "startup_catalog.db";
const DEFAULT_DATA_FILE: &str = "startup_data.json";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub database_path: String,
    /// Dataset read by `POST /load-data`
    pub data_file: PathBuf,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration, layering `file` (if any) and the environment over the defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(
            file,
            Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("data_file", DEFAULT_DATA_FILE)?
            .set_default("default_page_size", i64::from(DEFAULT_PAGE_SIZE))?
            .set_default("max_page_size", i64::from(MAX_PAGE_SIZE))?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("log_json", false)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: ServerConfig = builder
            .add_source(env)
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration values")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.database_path.trim().is_empty() {
            anyhow::bail!("database_path must not be empty");
        }
        if self.data_file.as_os_str().is_empty() {
            anyhow::bail!("data_file must not be empty");
        }
        if self.max_page_size == 0 {
            anyhow::bail!("max_page_size must be at least 1");
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "default_page_size must be between 1 and max_page_size ({}), got {}",
                self.max_page_size,
                self.default_page_size
            );
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Failed to parse bind address: {}", self.bind_address))
    }
}
