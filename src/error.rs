// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowseError>;

/// Failure classes for the search backend and configuration. The resolver
/// collapses every backend variant into a single internal-error response;
/// the distinction exists for the logs.
#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{url} timed out")]
    BackendTimeout { url: String },

    #[error("{url} refused connection")]
    BackendUnavailable { url: String },

    #[error("failed to reach {url}: {message}")]
    BackendUnreachable { url: String, message: String },

    #[error("failed to decode response from {url}: {message}")]
    BackendDecode { url: String, message: String },

    #[error("backend reported error {code}: {message}")]
    BackendReported { code: i64, message: String },
}
