//! Ports (trait definitions) for external dependencies
//!
//! The domain defines what it needs from the network, and the infrastructure
//! provides implementations.
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` so the retrieval service is monomorphized over its transport.

use std::future::Future;

use crate::retrieval::RelayError;

/// Raw outcome of a single relay request
///
/// The body is kept as text: whether it is the upstream payload itself or a
/// relay envelope around it is decided by the [`RelayStrategy`] that produced
/// the URL.
///
/// [`RelayStrategy`]: crate::retrieval::RelayStrategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    /// HTTP status code returned by the relay
    pub status: u16,
    /// Full response body
    pub body: String,
}

impl RelayResponse {
    /// Build a response from its parts
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Build a `200 OK` response
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Port for issuing GET requests to relay endpoints
///
/// Implementations must:
/// - Perform a single GET against the given absolute URL
/// - Return the status and the full body, even for non-2xx statuses
/// - Convert any client-level failure to `RelayError::Transport`
///
/// Timeouts are NOT the transport's job: the retrieval service bounds every
/// attempt itself.
pub trait RelayTransport: Send + Sync {
    /// Fetch `url` and return its status and body
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Transport` if the request could not be sent or the
    /// body could not be read
    fn get(&self, url: &str) -> impl Future<Output = Result<RelayResponse, RelayError>> + Send;
}
