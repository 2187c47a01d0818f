//! Error types for pubkit-runner

use std::time::Duration;
use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a pub command
#[derive(Debug, Error)]
pub enum Error {
    /// The command could not be started or waited on
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The command exited non-zero
    #[error("'{command}' failed: {stderr}")]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// Captured stderr output
        stderr: String,
    },

    /// The command exceeded the hard time limit
    #[error("'{command}' timed out after {limit:?}")]
    Timeout {
        /// The command line that was run
        command: String,
        /// The limit that was exceeded
        limit: Duration,
    },
}
