//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero status.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::ingest::LoadError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    /// A bound given on the command line could not be parsed
    #[error("invalid {name} '{value}'")]
    InvalidArgument { name: &'static str, value: String },

    /// Writing output failed
    #[error("output error: {0}")]
    Io(#[from] io::Error),

    #[error("output error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn invalid_argument(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            value: value.into(),
        }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(e) => e.code(),
            CliError::Load(e) => e.code(),
            CliError::InvalidArgument { .. } => "TRIP_CLI_INVALID_ARGUMENT",
            CliError::Io(_) | CliError::Json(_) => "TRIP_CLI_IO_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_codes_pass_through() {
        let err: CliError = LoadError::Open {
            path: PathBuf::from("x.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }
        .into();
        assert_eq!(err.code(), "TRIP_LOAD_OPEN_FAILED");
        assert!(err.to_string().contains("x.csv"));

        let err: CliError = ConfigError::Invalid("bad".into()).into();
        assert_eq!(err.code(), "TRIP_CONFIG_INVALID");
    }

    #[test]
    fn test_invalid_argument() {
        let err = CliError::invalid_argument("--min", "yesterday");
        assert_eq!(err.code(), "TRIP_CLI_INVALID_ARGUMENT");
        assert_eq!(err.to_string(), "invalid --min 'yesterday'");
    }
}
