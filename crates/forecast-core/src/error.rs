//! Error types for forecast operations.
//!
//! This module defines [`ForecastError`] which covers every failure that can
//! occur while loading the region catalog, fetching a forecast, extracting
//! records from it, or persisting them.

use thiserror::Error;

/// Errors that can occur during forecast operations.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// A local file could not be read.
    #[error("IO error: {0}")]
    Io(String),

    /// Network-related errors (connection failures, timeouts, non-success status).
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Input did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the record store.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The requested region key is not in the catalog.
    #[error("Region not found: {0}")]
    RegionNotFound(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl ForecastError {
    /// Returns true for transport and HTTP status failures.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Returns true when a document did not match the expected shape.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Result type alias using [`ForecastError`].
pub type Result<T> = std::result::Result<T, ForecastError>;
