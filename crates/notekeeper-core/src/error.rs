//! Error types for notekeeper-core

use thiserror::Error;

/// Result type alias using notekeeper-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notekeeper-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The remote note API rejected a request
    #[error("API error: {0}")]
    Api(String),

    /// Media/object storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or malformed backend configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Session persistence error
    #[error("Session error: {0}")]
    Session(String),
}
