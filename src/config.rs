//! Application configuration
//!
//! Loaded from a TOML file (default: `~/.config/pagination-flow/config.toml`).
//! Every section and field has a default, so a partial file or no file at
//! all still yields a usable configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::MAX_WINDOW_VALUE;
use crate::infrastructure::DatabaseConfig;

/// Page size used by the product listing when the config does not say
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for in-flight requests to finish on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// SeaORM over SQLite
    Sqlite,
    /// Process-local maps, lost on exit
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub backend: DatabaseBackend,
    /// SQLite file path, used when `url` is not set
    pub path: String,
    /// Full connection URL; overrides `path`
    pub url: Option<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Sqlite,
            path: "./catalog.db".to_string(),
            url: None,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        self.to_database_config().url
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        match &self.url {
            Some(url) => DatabaseConfig { url: url.clone() },
            None => DatabaseConfig::sqlite(&self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. "info" or "pagination_flow=debug"
    pub level: String,
    /// "plain" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Products per page on the listing routes
    pub page_size: u64,
    /// Insert demo products when the catalog is empty at startup
    pub seed_demo_products: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            seed_demo_products: true,
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.page_size == 0 {
            return Err(ConfigError::Invalid(
                "catalog.page_size must be at least 1".to_string(),
            ));
        }
        if self.catalog.page_size > MAX_WINDOW_VALUE {
            return Err(ConfigError::Invalid(format!(
                "catalog.page_size must be at most {}",
                MAX_WINDOW_VALUE
            )));
        }
        if self.database.backend == DatabaseBackend::Sqlite
            && self.database.url.is_none()
            && self.database.path.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "database.path or database.url is required for the sqlite backend".to_string(),
            ));
        }
        Ok(())
    }
}

/// `~/.config/pagination-flow/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("pagination-flow").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
