//! Errors for a single relay attempt
//!
//! None of these reach the caller of `fetch_video` directly. All but
//! `IncompletePayload` mark the current relay as failed so the service can
//! move on to the next.

use std::time::Duration;

use thiserror::Error;

/// Reasons a relay attempt did not produce a usable answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// No response within the per-attempt bound
    #[error("Relay timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The request could not be sent or its body could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// The relay answered with a non-2xx status
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    /// The enveloped relay returned no `contents`
    #[error("No content received from proxy")]
    MissingContents,

    /// The body (or the envelope's contents) is not valid JSON
    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    /// Upstream reported success but the video data is missing or has no
    /// play URL; the service turns this into a final failure
    #[error("Incomplete payload: {0}")]
    IncompletePayload(String),

    /// Upstream message carries a rate-limit or quota marker
    #[error("Relay rate limited: {0}")]
    RateLimited(String),
}

impl RelayError {
    /// Create a timeout error from the bound that elapsed
    pub fn timeout(bound: Duration) -> Self {
        Self::Timeout {
            duration_ms: u64::try_from(bound.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a transport error with a message
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid JSON error with a message
    pub fn invalid_json(msg: impl Into<String>) -> Self {
        Self::InvalidJson(msg.into())
    }

    /// Create an incomplete payload error with a message
    pub fn incomplete_payload(msg: impl Into<String>) -> Self {
        Self::IncompletePayload(msg.into())
    }

    /// Whether this failure came from an upstream rate-limit signal
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

/// Result type alias for relay attempts
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error() {
        let err = RelayError::timeout(Duration::from_secs(15));
        assert_eq!(err, RelayError::Timeout { duration_ms: 15_000 });
        assert_eq!(err.to_string(), "Relay timed out after 15000ms");
    }

    #[test]
    fn test_http_status_error() {
        let err = RelayError::HttpStatus(502);
        assert_eq!(err.to_string(), "HTTP error! status: 502");
    }

    #[test]
    fn test_rate_limited_flag() {
        assert!(RelayError::RateLimited("Api Limit".into()).is_rate_limited());
        assert!(!RelayError::MissingContents.is_rate_limited());
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = RelayError::from(parse_err);
        assert!(matches!(err, RelayError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON response"));
    }
}
