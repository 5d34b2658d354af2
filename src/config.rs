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
    pub server: ServerConfig,

    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024 // 32 MiB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
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

/// Training dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("boneage-training-dataset.csv")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

/// Prediction model services
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Endpoint of the first model service. Empty disables the model.
    #[serde(default = "default_model1_url")]
    pub model1_url: String,

    /// Endpoint of the second model service. Empty disables the model.
    #[serde(default = "default_model2_url")]
    pub model2_url: String,

    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,

    /// Side length, in pixels, of the square image sent to the models
    #[serde(default = "default_input_size")]
    pub input_size: u32,
}

fn default_model1_url() -> String {
    "http://localhost:8501/model1".to_string()
}

fn default_model2_url() -> String {
    "http://localhost:8501/model2".to_string()
}

fn default_model_timeout() -> u64 {
    30
}

fn default_input_size() -> u32 {
    256
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            model1_url: default_model1_url(),
            model2_url: default_model2_url(),
            timeout_secs: default_model_timeout(),
            input_size: default_input_size(),
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
    "boneage_dashboard=info,tower_http=debug".to_string()
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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

    /// Load from default locations or environment.
    ///
    /// Runs before the subscriber is installed, so problems are returned to
    /// the caller instead of logged here.
    pub fn load_default() -> (Self, ConfigSource) {
        let config_paths = [
            Self::user_config_path(),
            Some(PathBuf::from("/etc/boneage/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        let mut skipped = Vec::new();
        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => return (config, ConfigSource::File(path.clone(), skipped)),
                    Err(e) => skipped.push(e),
                }
            }
        }

        (Self::from_env(), ConfigSource::Environment(skipped))
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `BONEAGE_*` overrides looked up through `get`. A port that does
    /// not parse leaves the current port in place.
    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(host) = get("BONEAGE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("BONEAGE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Some(path) = get("BONEAGE_DATASET") {
            self.dataset.path = PathBuf::from(path);
        }

        if let Some(url) = get("BONEAGE_MODEL1_URL") {
            self.models.model1_url = url;
        }
        if let Some(url) = get("BONEAGE_MODEL2_URL") {
            self.models.model2_url = url;
        }

        if let Some(level) = get("BONEAGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = get("BONEAGE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Per-user config file, the first location `load_default` searches
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("boneage").join("config.toml"))
    }

    /// Write the commented default config to `path`, creating parent
    /// directories. An existing file is left untouched; returns whether a
    /// file was written.
    pub fn write_default(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }

        let io_error = |e: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, generate_default_config()).map_err(io_error)?;
        Ok(true)
    }
}

/// Where the effective configuration came from, with any config files that
/// were found but could not be loaded.
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf, Vec<ConfigError>),
    Environment(Vec<ConfigError>),
}

impl ConfigSource {
    pub fn skipped(&self) -> &[ConfigError] {
        match self {
            ConfigSource::File(_, skipped) | ConfigSource::Environment(skipped) => skipped,
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
    r#"# Bone Age App Configuration
#
# Environment variables override these settings:
# - BONEAGE_HOST
# - BONEAGE_PORT
# - BONEAGE_DATASET
# - BONEAGE_MODEL1_URL
# - BONEAGE_MODEL2_URL
# - BONEAGE_LOG_LEVEL
# - BONEAGE_LOG_FORMAT

[server]
host = "127.0.0.1"
port = 8888

# Largest accepted upload request (bytes)
max_upload_bytes = 33554432

[dataset]
# RSNA training CSV with at least `boneage` and `male` columns
path = "boneage-training-dataset.csv"

[models]
# Model service endpoints; leave empty to disable a model
model1_url = "http://localhost:8501/model1"
model2_url = "http://localhost:8501/model2"

# Per-request timeout (seconds)
timeout_secs = 30

# Images are converted to grayscale and resized to this square size
input_size = 256

[logging]
# EnvFilter directive, e.g. "info" or "boneage_dashboard=debug"
level = "boneage_dashboard=info,tower_http=debug"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
