//! Error types for obc-providers

use thiserror::Error;

/// Result type alias using obc-providers Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when calling a capability provider
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error: {message} (type: {error_type})")]
    Api { error_type: String, message: String },

    /// Invalid API key
    #[error("Invalid or missing API key")]
    InvalidApiKey,

    /// Unexpected response format
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Create an API error from type and message
    pub fn api(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a bounded-wait expiry. Timeouts are handled
    /// the same way as any other provider failure; this only exists so
    /// callers can log them distinctly.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_constructor() {
        let e = Error::api("rate_limit", "slow down");
        let msg = e.to_string();
        assert!(msg.contains("slow down"), "got: {}", msg);
        assert!(msg.contains("rate_limit"), "got: {}", msg);
    }

    #[test]
    fn test_non_http_errors_are_not_timeouts() {
        assert!(!Error::InvalidApiKey.is_timeout());
        assert!(!Error::api("x", "y").is_timeout());
        assert!(!Error::UnexpectedResponse("empty".into()).is_timeout());
    }
}
