//! Load errors
//!
//! Only I/O failures are fatal. Bad rows are counted and discarded by the
//! source and never reach this type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for ingestion
pub type LoadResult<T> = Result<T, LoadError>;

/// Fatal failure while loading a dataset
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be opened
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading failed part way through
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Open { .. } => "TRIP_LOAD_OPEN_FAILED",
            LoadError::Read { .. } => "TRIP_LOAD_READ_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_display() {
        let err = LoadError::Open {
            path: PathBuf::from("trips.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.code(), "TRIP_LOAD_OPEN_FAILED");
        assert!(err.to_string().contains("trips.csv"));
    }

    #[test]
    fn test_read_error_keeps_source() {
        let err = LoadError::Read {
            line: 12,
            source: io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        };
        assert_eq!(err.code(), "TRIP_LOAD_READ_FAILED");
        assert!(std::error::Error::source(&err).is_some());
    }
}
