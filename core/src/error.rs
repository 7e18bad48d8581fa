//! Error types for the psview-core library.

use thiserror::Error;

/// Result type alias for psview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while enumerating processes or reading sockets.
///
/// Per-process extraction never produces these; only the collaborators and
/// the configuration store do.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
