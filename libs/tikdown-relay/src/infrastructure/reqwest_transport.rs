//! reqwest Relay Transport Implementation
//!
//! This module implements the `RelayTransport` trait with a shared
//! `reqwest::Client`. It converts client errors to domain errors.

use reqwest::Client;
use tikdown_domain::{RelayError, RelayResponse, RelayTransport};
use tracing::{debug, instrument, warn};

/// Browser-like user agent; some relays refuse obvious bots
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Largest relay body read before the attempt is abandoned (8 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// reqwest-based implementation of the RelayTransport port
///
/// ## Error Handling
///
/// Send and body-read failures become `RelayError::Transport`. Non-2xx
/// statuses are NOT errors here: the status is returned with the body and the
/// retrieval service decides what to do with it.
///
/// Bodies larger than `max_body_bytes` are also `RelayError::Transport`,
/// checked against `Content-Length` first and then while streaming.
///
/// No request timeout is set on the client; the retrieval service bounds
/// each attempt.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_body_bytes: usize,
}

impl ReqwestTransport {
    /// Create a transport with the default user agent and gzip enabled
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Transport` if the TLS backend cannot be initialized
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use tikdown_domain::RetrievalService;
    /// use tikdown_relay::infrastructure::ReqwestTransport;
    ///
    /// # async fn example() -> Result<(), tikdown_domain::RelayError> {
    /// let service = RetrievalService::with_transport(ReqwestTransport::new()?);
    /// let result = service.fetch_video("https://www.tiktok.com/@user/video/123").await;
    /// println!("{}", result.msg());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Result<Self, RelayError> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| RelayError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Override the body size limit
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

impl RelayTransport for ReqwestTransport {
    #[instrument(skip(self))]
    fn get(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<RelayResponse, RelayError>> + Send {
        let client = self.client.clone();
        let max_body_bytes = self.max_body_bytes;
        let url = url.to_string();

        async move {
            debug!(url = %url, "Sending relay request");

            let mut response = match client.get(&url).send().await {
                Ok(response) => response,
                Err(err) => {
                    warn!(url = %url, error = ?err, "Relay request failed");
                    return Err(RelayError::transport(format!(
                        "GET '{}' failed: {}",
                        url, err
                    )));
                }
            };

            let status = response.status().as_u16();

            if let Some(length) = response.content_length() {
                if length > max_body_bytes as u64 {
                    warn!(url = %url, status, length, "Relay body too large");
                    return Err(body_too_large(&url, max_body_bytes));
                }
            }

            let mut body = Vec::new();
            loop {
                match response.chunk().await {
                    Ok(Some(chunk)) => {
                        if body.len() + chunk.len() > max_body_bytes {
                            warn!(url = %url, status, "Relay body too large");
                            return Err(body_too_large(&url, max_body_bytes));
                        }
                        body.extend_from_slice(&chunk);
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!(url = %url, status, error = ?err, "Failed to read relay body");
                        return Err(RelayError::transport(format!(
                            "Failed to read body from '{}': {}",
                            url, err
                        )));
                    }
                }
            }

            let body = String::from_utf8_lossy(&body).into_owned();
            debug!(url = %url, status, size = body.len(), "Relay responded");
            Ok(RelayResponse::new(status, body))
        }
    }
}

fn body_too_large(url: &str, max_body_bytes: usize) -> RelayError {
    RelayError::transport(format!(
        "Body from '{}' exceeds {} bytes",
        url, max_body_bytes
    ))
}
