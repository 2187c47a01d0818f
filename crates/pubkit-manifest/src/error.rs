//! Error types for pubkit-manifest

use thiserror::Error;

/// Result type alias using pubkit-manifest Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or editing a manifest
#[derive(Debug, Error)]
pub enum Error {
    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document root is not a mapping
    ///
    /// This is the only fatal shape error; any missing or mistyped
    /// field inside a valid mapping degrades to an absent value instead.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}
