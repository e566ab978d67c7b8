//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::etf::DEFAULT_TOP_HOLDINGS_COUNT;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub prices: PricesConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Price table configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PricesConfig {
    #[serde(default = "default_prices_path")]
    pub path: String,

    #[serde(default = "default_date_column")]
    pub date_column: String,
}

fn default_prices_path() -> String {
    "data/prices.csv".to_string()
}

fn default_date_column() -> String {
    "DATE".to_string()
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            path: default_prices_path(),
            date_column: default_date_column(),
        }
    }
}

/// Upload processing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_top_holdings")]
    pub default_top_holdings: usize,
}

fn default_top_holdings() -> usize {
    DEFAULT_TOP_HOLDINGS_COUNT
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            default_top_holdings: default_top_holdings(),
        }
    }
}

/// CLI client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API server used by `etf-monitor upload`
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, the default locations, or the environment
    ///
    /// Nothing is logged here, since this runs before the subscriber is
    /// installed. Call [`LoadedConfig::log_source`] once logging is up.
    pub fn load_default(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        if let Some(path) = explicit {
            return Ok(LoadedConfig {
                config: Self::load_with_env(path)?,
                source: Some(path.to_path_buf()),
                skipped: Vec::new(),
            });
        }

        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("etf-monitor").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(Self::load_first(&config_paths))
    }

    /// First candidate that exists and parses, else defaults
    fn load_first(candidates: &[PathBuf]) -> LoadedConfig {
        let mut skipped = Vec::new();

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        skipped,
                    };
                }
                Err(e) => skipped.push(e),
            }
        }

        LoadedConfig {
            config: Self::from_env(),
            source: None,
            skipped,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("ETF_MONITOR_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("ETF_MONITOR_PORT").or_else(|| var("PORT")) {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Price table overrides
        if let Some(path) = var("ETF_MONITOR_PRICES_FILE") {
            self.prices.path = path;
        }

        // Upload overrides
        if let Some(count) = var("ETF_MONITOR_TOP_HOLDINGS") {
            if let Ok(n) = count.parse() {
                self.upload.default_top_holdings = n;
            }
        }

        // Client overrides
        if let Some(url) = var("ETF_MONITOR_API_URL") {
            self.client.api_url = Some(url);
        }

        // Logging overrides
        if let Some(level) = var("ETF_MONITOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ETF_MONITOR_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// A configuration and the file it was read from
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when only defaults and environment overrides apply
    pub source: Option<PathBuf>,
    /// Config files that were found but could not be loaded
    pub skipped: Vec<ConfigError>,
}

impl LoadedConfig {
    /// Log where the configuration came from
    pub fn log_source(&self) {
        for error in &self.skipped {
            tracing::warn!("Skipped config file: {}", error);
        }

        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# ETF Monitor Configuration
#
# Environment variables override these settings:
# - ETF_MONITOR_HOST
# - ETF_MONITOR_PORT (or PORT)
# - ETF_MONITOR_PRICES_FILE
# - ETF_MONITOR_TOP_HOLDINGS
# - ETF_MONITOR_API_URL
# - ETF_MONITOR_LOG_LEVEL
# - ETF_MONITOR_LOG_FORMAT

[server]
# API server host
host = "0.0.0.0"

# API server port
port = 5000

# Allowed CORS origins (empty = any origin)
cors_origins = []

# Largest accepted upload (bytes)
max_upload_bytes = 10485760

[prices]
# Wide CSV: a date column followed by one column per ticker
path = "data/prices.csv"

# Name of the date column
date_column = "DATE"

[upload]
# Top holdings returned when the request has no top_holdings_count
default_top_holdings = 10

[client]
# API server used by `etf-monitor upload` (default: http://localhost:5000)
# api_url = "http://localhost:5000"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
