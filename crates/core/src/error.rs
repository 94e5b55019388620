//! Error types for mf-core
//!
//! Provides a unified error type shared by the location resolver and the
//! directory backends.

use thiserror::Error;

/// Result type alias for mf-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for mf-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed URI, missing scheme, path traversal, or unsupported scheme
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Create attempted on an object-storage prefix that is already occupied
    #[error("Directory already exists: {0}")]
    AlreadyExists(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Backend failure, wrapped with the location it occurred on
    #[error("Storage operation failed on {path}: {source}")]
    Internal {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Wrap a backend failure with the location it occurred on
    pub fn internal(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Internal {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether this error reports a rejected input rather than a backend fault
    pub const fn is_invalid_location(&self) -> bool {
        matches!(self, Error::InvalidLocation(_))
    }
}
