//! Error types for entity-store.
//!
//! All errors are strongly typed using thiserror so callers can match
//! on the failure kind instead of parsing messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by stores, codecs and the list cache.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The collection could not be encoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Encoder message.
        message: String,
    },

    /// Stored text is not a valid collection of the expected entity type.
    #[error("Deserialization error in {}: {message}", path.display())]
    Deserialization {
        /// File holding the bad data.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The in-memory cache was mutated but the store write failed, and the
    /// provider was configured to keep the mutation.
    #[error("Cache diverged from backing store: {source}")]
    InconsistentCache {
        /// The store failure that left the cache ahead of the store.
        #[source]
        source: Box<StoreError>,
    },

    /// Backend failure not tied to a file, such as a poisoned lock.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Rejected configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What was rejected.
        message: String,
    },
}

impl StoreError {
    /// Creates an I/O error for the given path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns true if this is an I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if stored data failed to decode.
    #[must_use]
    pub const fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }

    /// Returns true if the cache and the store no longer agree.
    #[must_use]
    pub const fn is_inconsistent_cache(&self) -> bool {
        matches!(self, Self::InconsistentCache { .. })
    }

    /// Returns the underlying store failure, looking through `InconsistentCache`.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::InconsistentCache { source } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = StoreError::io(
            "/tmp/data.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = format!("{err}");
        assert!(msg.contains("/tmp/data.json"));
        assert!(msg.contains("denied"));
        assert!(err.is_io());
        assert!(!err.is_deserialization());
    }

    #[test]
    fn test_deserialization_error() {
        let err = StoreError::Deserialization {
            path: PathBuf::from("list.json"),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.is_deserialization());
        assert!(format!("{err}").contains("list.json"));
    }

    #[test]
    fn test_inconsistent_cache_root_cause() {
        let inner = StoreError::io("x.json", io::Error::new(io::ErrorKind::Other, "disk full"));
        let err = StoreError::InconsistentCache {
            source: Box::new(inner),
        };
        assert!(err.is_inconsistent_cache());
        assert!(err.root_cause().is_io());
        assert!(format!("{err}").contains("disk full"));
    }

    #[test]
    fn test_invalid_config() {
        let err = StoreError::invalid_config("path must not be empty");
        assert!(format!("{err}").contains("path must not be empty"));
        assert!(!err.is_io());
    }
}
