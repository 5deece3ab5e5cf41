//! Error types for fleet client operations

use thiserror::Error;

/// Result type alias for fleet client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the fleet backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request never reached a server (DNS failure, refused connection)
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Request exceeded its time budget
    #[error("Request timed out")]
    Timeout,

    /// Credentials rejected by the authentication endpoint
    #[error("Authentication rejected (HTTP {status})")]
    AuthRejected { status: u16 },

    /// Bearer token rejected on a data call
    #[error("Bearer token expired")]
    TokenExpired,

    /// Backend returned an error response
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level failure that did reach a server
    #[error("HTTP request failed: {0}")]
    Http(String),
}

impl ApiError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Connectivity-class failures flip the client into offline mode
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Connection(_))
    }

    /// Transient server errors are worth a retry with backoff
    pub fn is_transient_server(&self) -> bool {
        matches!(self, ApiError::Server { status, .. } if *status >= 500)
    }

    /// Classify a reqwest transport error
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        assert!(ApiError::Connection("refused".into()).is_connectivity());
        assert!(!ApiError::Timeout.is_connectivity());
        assert!(!ApiError::server_error(500, "boom").is_connectivity());
    }

    #[test]
    fn test_transient_server_classification() {
        assert!(ApiError::server_error(500, "boom").is_transient_server());
        assert!(ApiError::server_error(503, "unavailable").is_transient_server());
        assert!(!ApiError::server_error(404, "missing").is_transient_server());
        assert!(!ApiError::Timeout.is_transient_server());
    }
}
