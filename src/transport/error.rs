//! Error types for the transport layer.

use thiserror::Error;

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Backend answered with a non-success status.
    #[error("backend returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body was not the expected JSON.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Reading the file to upload failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether the request may have reached the backend.
    #[must_use]
    pub const fn reached_backend(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::JsonParse(_))
    }
}

/// Convenience result alias for transport calls.
pub type TransportResult<T> = Result<T, TransportError>;
