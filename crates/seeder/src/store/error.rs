//! Document store error types.

use thiserror::Error;

/// Errors that can occur when talking to a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The emulator returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Security rules rejected the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Document or collection does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A path does not address a collection or document.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The emulator address could not be turned into a URL.
    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}
