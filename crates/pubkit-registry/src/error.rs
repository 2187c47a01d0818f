//! Error types for pubkit-registry

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the registry
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid package name format
    #[error("Invalid package name: {0}")]
    InvalidPackageName(String),

    /// Package not found in the registry
    #[error("Package '{0}' not found on pub.dev")]
    PackageNotFound(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded for URL: {0}")]
    RateLimitExceeded(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
