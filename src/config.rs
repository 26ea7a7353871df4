//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/obesity_data.csv")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty means any origin is allowed
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Dashboard client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_report_path")]
    pub output: PathBuf,

    /// Rows of the dataset table printed to the terminal
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_client_timeout() -> u64 {
    10
}

fn default_report_path() -> PathBuf {
    PathBuf::from("dashboard.html")
}

fn default_max_rows() -> usize {
    25
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_client_timeout(),
            output: default_report_path(),
            max_rows: default_max_rows(),
        }
    }
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

        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
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

    /// Config files searched by `load_default`, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("obesity-dash").join("config.toml")),
            Some(PathBuf::from("/etc/obesity-dash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from the first default location that exists, or environment only
    ///
    /// Returns the file that was used so the caller can log it once logging
    /// is set up.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first existing file in `candidates`. A file that exists but
    /// cannot be read or parsed is an error, never skipped.
    pub fn load_first(candidates: &[PathBuf]) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Ok((Self::load_with_env(path)?, Some(path.clone()))),
            None => Ok((Self::from_env(), None)),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("OBESITY_DATASET_PATH") {
            self.dataset.path = PathBuf::from(path);
        }

        if let Some(host) = lookup("OBESITY_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("OBESITY_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        if let Some(url) = lookup("OBESITY_API_URL") {
            self.dashboard.api_url = url;
        }
        if let Some(secs) = lookup("OBESITY_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.dashboard.timeout_secs = secs;
        }

        if let Some(level) = lookup("OBESITY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("OBESITY_LOG_FORMAT") {
            self.logging.format = format;
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
    r#"# Obesity Dash Configuration
#
# Environment variables override these settings:
# - OBESITY_DATASET_PATH
# - OBESITY_API_HOST
# - OBESITY_API_PORT
# - OBESITY_API_URL
# - OBESITY_TIMEOUT_SECS
# - OBESITY_LOG_LEVEL
# - OBESITY_LOG_FORMAT

[dataset]
# CSV file loaded once at startup. Needs Height, Weight and Age columns.
path = "data/obesity_data.csv"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8000

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

[dashboard]
# Base URL of the data service
api_url = "http://localhost:8000"

# Per-request timeout in seconds
timeout_secs = 10

# HTML report written by `obesity-dashboard render`
output = "dashboard.html"

# Dataset rows printed to the terminal
max_rows = 25

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
