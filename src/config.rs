//! Engine configuration
//!
//! Loaded from a JSON file. Every field is optional; omitted fields take
//! their defaults.
//!
//! ```json
//! { "parallel_threshold": 10000, "min_chunk_len": 2048, "log_level": "info" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "TRIP_CONFIG_READ_FAILED",
            ConfigError::Parse(_) => "TRIP_CONFIG_PARSE_FAILED",
            ConfigError::Invalid(_) => "TRIP_CONFIG_INVALID",
        }
    }
}

/// Tunables for loading and querying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Candidate count above which a scan is split across workers
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Smallest partition handed to a single worker
    #[serde(default = "default_min_chunk_len")]
    pub min_chunk_len: usize,

    /// Records reserved before a load when the source has no size estimate
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,

    /// Minimum log severity ("trace", "info", "warn", "error", "fatal")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_parallel_threshold() -> usize {
    10_000
}

fn default_min_chunk_len() -> usize {
    2_048
}

fn default_initial_capacity() -> usize {
    1_000_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
            min_chunk_len: default_min_chunk_len(),
            initial_capacity: default_initial_capacity(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.parallel_threshold == 0 {
            return Err(ConfigError::Invalid("parallel_threshold must be > 0".into()));
        }
        if self.min_chunk_len == 0 {
            return Err(ConfigError::Invalid("min_chunk_len must be > 0".into()));
        }
        self.severity()?;
        Ok(())
    }

    /// The configured minimum log severity
    pub fn severity(&self) -> ConfigResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConfigError::Invalid(format!("unknown log_level '{}'", self.log_level))
        })
    }
}
