//! Retrieval service - relay fallback orchestration
//!
//! This module contains the one piece of real decision logic in TikDown: trying
//! each relay in order, moving on after transient failures, and stopping at
//! the first definitive answer from the extraction API.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::entity::{ApiResult, UpstreamRequest};
use super::envelope::{normalize, UpstreamEnvelope};
use super::error::{RelayError, Result};
use super::link::{VideoLink, DEFAULT_DOMAIN_MARKER};
use super::relay::RelayStrategy;
use crate::ports::RelayTransport;

/// Extraction API queried through the relays
pub const DEFAULT_API_ENDPOINT: &str = "https://tikwm.com/api/";

/// Returned without any network call when the link fails the domain check
pub const INVALID_LINK_MSG: &str = "Invalid TikTok URL. Please paste a valid link.";

/// Recorded when a relay reports a rate limit; returned if every relay fails
pub const RATE_LIMITED_MSG: &str = "Server is busy (Rate Limit). Switching connection...";

/// Returned when every relay fails and none reported a rate limit
pub const HIGH_TRAFFIC_MSG: &str =
    "Server is currently busy due to high traffic. Please try again in a few seconds.";

/// Returned when the upstream reports success but its video data is unusable
pub const UNREADABLE_VIDEO_MSG: &str =
    "The video was found but its data could not be read. Please try another link.";

/// Configuration for the retrieval service
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Extraction API endpoint (default: tikwm)
    pub api_endpoint: String,
    /// Substring a link must contain (default: "tiktok.com")
    pub domain_marker: String,
    /// Case-sensitive substrings that flag an upstream message as rate limiting
    pub rate_limit_markers: Vec<String>,
    /// Bound on a single relay attempt, headers and body included (default: 15s)
    pub attempt_timeout: Duration,
    /// Ask the API for the HD variant (default: true)
    pub prefer_hd: bool,
    /// Relays in fallback order
    pub relays: Vec<RelayStrategy>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            domain_marker: DEFAULT_DOMAIN_MARKER.to_string(),
            rate_limit_markers: vec!["Limit".to_string(), "quota".to_string()],
            attempt_timeout: Duration::from_secs(15),
            prefer_hd: true,
            relays: RelayStrategy::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl RetrievalConfig {
    /// Whether an upstream message signals rate limiting
    pub fn is_rate_limited(&self, msg: &str) -> bool {
        self.rate_limit_markers
            .iter()
            .any(|marker| msg.contains(marker.as_str()))
    }
}

/// Service that resolves a pasted link into video metadata
///
/// `fetch_video` never fails: input errors, exhausted relays and upstream
/// errors all come back as [`ApiResult::Failure`].
///
/// ## Static Dispatch
///
/// The service is generic over any `RelayTransport` implementation.
pub struct RetrievalService<T> {
    transport: T,
    config: RetrievalConfig,
}

impl<T> RetrievalService<T>
where
    T: RelayTransport,
{
    /// Create a new RetrievalService with the given transport and configuration
    pub fn new(transport: T, config: RetrievalConfig) -> Self {
        Self { transport, config }
    }

    /// Create a new RetrievalService with default configuration
    pub fn with_transport(transport: T) -> Self {
        Self::new(transport, RetrievalConfig::default())
    }

    /// Resolve `link` into video metadata
    ///
    /// 1. Rejects links without the domain marker, before any network access
    /// 2. Builds one upstream URL for the whole call
    /// 3. Tries each relay in order; timeouts, bad statuses, unparsable bodies
    ///    and rate-limit messages move on to the next relay
    /// 4. Returns the first success, or the first upstream error that is not
    ///    a rate limit, verbatim
    ///
    /// When every relay fails the result carries [`RATE_LIMITED_MSG`] if any
    /// relay was rate limited, else [`HIGH_TRAFFIC_MSG`].
    pub async fn fetch_video(&self, link: &str) -> ApiResult {
        let link = match VideoLink::parse(link, &self.config.domain_marker) {
            Ok(link) => link,
            Err(err) => {
                warn!(error = %err, "Rejected link");
                return ApiResult::failure(INVALID_LINK_MSG);
            }
        };

        let request = UpstreamRequest::new(&self.config.api_endpoint, link, self.config.prefer_hd);
        let target = request.resolved_url();

        let mut last_msg: Option<&'static str> = None;

        for strategy in &self.config.relays {
            match self.attempt(*strategy, &target).await {
                Ok(result) => {
                    info!(relay = %strategy, code = result.code(), "Relay answered");
                    return result;
                }
                Err(RelayError::RateLimited(msg)) => {
                    warn!(relay = %strategy, upstream_msg = %msg, "Relay rate limited");
                    last_msg = Some(RATE_LIMITED_MSG);
                }
                Err(err) => {
                    warn!(relay = %strategy, error = %err, "Relay attempt failed");
                }
            }
        }

        error!(link = %request.link(), "All relays failed");
        ApiResult::failure(last_msg.unwrap_or(HIGH_TRAFFIC_MSG))
    }

    /// One relay attempt: request, status check, normalization, classification
    async fn attempt(&self, strategy: RelayStrategy, target: &str) -> Result<ApiResult> {
        let url = strategy.proxied_url(target);
        debug!(relay = %strategy, url = %url, "Trying relay");

        let response = tokio::time::timeout(self.config.attempt_timeout, self.transport.get(&url))
            .await
            .map_err(|_| RelayError::timeout(self.config.attempt_timeout))??;

        if !response.is_success() {
            return Err(RelayError::HttpStatus(response.status));
        }

        let envelope = normalize(strategy.response_shape(), &response.body)?;
        self.classify(envelope)
    }

    /// Decide between moving on and returning
    ///
    /// The rate-limit check comes first: a rate-limit message wins over any
    /// code the upstream attached to it. A success code is final even when its
    /// data cannot be decoded.
    fn classify(&self, envelope: UpstreamEnvelope) -> Result<ApiResult> {
        if self.config.is_rate_limited(&envelope.msg) {
            return Err(RelayError::RateLimited(envelope.msg));
        }

        if envelope.is_success() {
            return Ok(match envelope.into_metadata() {
                Ok(video) => ApiResult::Success(video),
                Err(err) => {
                    warn!(error = %err, "Upstream succeeded without usable video data");
                    ApiResult::failure(UNREADABLE_VIDEO_MSG)
                }
            });
        }

        Ok(ApiResult::Failure {
            code: envelope.code,
            msg: envelope.msg,
        })
    }

    /// Get the service configuration
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RelayResponse;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    // Scripted transport: pops one canned outcome per call and records URLs
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        script: Arc<Mutex<VecDeque<Result<RelayResponse>>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<RelayResponse>>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RelayTransport for ScriptedTransport {
        fn get(
            &self,
            url: &str,
        ) -> impl std::future::Future<Output = Result<RelayResponse>> + Send {
            self.calls.lock().unwrap().push(url.to_string());
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RelayError::transport("script exhausted")));

            async move { next }
        }
    }

    const LINK: &str = "https://www.tiktok.com/@user/video/123";

    fn success_body() -> String {
        r#"{"code":0,"msg":"success","data":{"id":"123","play":"https://cdn.example/play.mp4"}}"#
            .to_string()
    }

    #[tokio::test]
    async fn test_invalid_link_skips_network() {
        let transport = ScriptedTransport::default();
        let service = RetrievalService::with_transport(transport.clone());

        let result = service.fetch_video("https://example.com/video/1").await;

        assert_eq!(result, ApiResult::failure(INVALID_LINK_MSG));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_first_relay_success() {
        let transport = ScriptedTransport::new(vec![Ok(RelayResponse::ok(success_body()))]);
        let service = RetrievalService::with_transport(transport.clone());

        let result = service.fetch_video(LINK).await;

        assert!(result.is_success());
        assert_eq!(result.data().unwrap().id, "123");
        assert_eq!(transport.calls().len(), 1);
        assert!(transport.calls()[0].starts_with("https://api.allorigins.win/raw?url="));
    }

    #[tokio::test]
    async fn test_http_status_moves_to_next_relay() {
        let transport = ScriptedTransport::new(vec![
            Ok(RelayResponse::new(503, "unavailable")),
            Ok(RelayResponse::ok(
                serde_json::json!({ "contents": success_body() }).to_string(),
            )),
        ]);
        let service = RetrievalService::with_transport(transport.clone());

        let result = service.fetch_video(LINK).await;

        assert!(result.is_success());
        assert_eq!(transport.calls().len(), 2);
        assert!(transport.calls()[1].starts_with("https://api.allorigins.win/get?url="));
    }

    #[tokio::test]
    async fn test_definitive_error_returned_verbatim() {
        let body = r#"{"code":-1,"msg":"Url parsing is failed! Please check url."}"#;
        let transport = ScriptedTransport::new(vec![
            Err(RelayError::transport("connection reset")),
            Ok(RelayResponse::ok(serde_json::json!({ "contents": body }).to_string())),
            Ok(RelayResponse::ok(success_body())),
        ]);
        let service = RetrievalService::with_transport(transport.clone());

        let result = service.fetch_video(LINK).await;

        assert_eq!(
            result,
            ApiResult::Failure {
                code: -1,
                msg: "Url parsing is failed! Please check url.".to_string()
            }
        );
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_then_success() {
        let transport = ScriptedTransport::new(vec![
            Ok(RelayResponse::ok(r#"{"code":-1,"msg":"Free Api Limit: 1 request/second."}"#)),
            Ok(RelayResponse::ok(serde_json::json!({ "contents": success_body() }).to_string())),
        ]);
        let service = RetrievalService::with_transport(transport.clone());

        let result = service.fetch_video(LINK).await;

        assert!(result.is_success());
        assert_eq!(transport.calls().len(), 2);
    }

    #[test]
    fn test_rate_limit_wins_over_success_code() {
        let service = RetrievalService::with_transport(ScriptedTransport::default());
        let envelope = UpstreamEnvelope {
            code: 0,
            msg: "daily quota reached".to_string(),
            processed_time: None,
            data: None,
        };

        assert!(matches!(
            service.classify(envelope),
            Err(RelayError::RateLimited(_))
        ));
    }

    #[tokio::test]
    async fn test_success_without_usable_data_is_final() {
        for body in [
            r#"{"code":0,"msg":"success"}"#,
            r#"{"code":0,"msg":"success","data":{"id":"1"}}"#,
        ] {
            let transport = ScriptedTransport::new(vec![
                Ok(RelayResponse::ok(body)),
                Ok(RelayResponse::ok(success_body())),
            ]);
            let service = RetrievalService::with_transport(transport.clone());

            let result = service.fetch_video(LINK).await;

            assert_eq!(result, ApiResult::failure(UNREADABLE_VIDEO_MSG), "body: {}", body);
            assert_eq!(transport.calls().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_exhaustion_without_rate_limit() {
        let transport = ScriptedTransport::new(vec![
            Ok(RelayResponse::ok("<html>blocked</html>")),
            Ok(RelayResponse::ok(r#"{"status":"error"}"#)),
            Ok(RelayResponse::new(403, "")),
            Ok(RelayResponse::ok("42")),
        ]);
        let service = RetrievalService::with_transport(transport.clone());

        let result = service.fetch_video(LINK).await;

        assert_eq!(result, ApiResult::failure(HIGH_TRAFFIC_MSG));
        assert_eq!(transport.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_custom_relay_order() {
        let transport = ScriptedTransport::new(vec![Ok(RelayResponse::ok(success_body()))]);
        let config = RetrievalConfig {
            relays: vec![RelayStrategy::CodeTabs],
            ..RetrievalConfig::default()
        };
        let service = RetrievalService::new(transport.clone(), config);

        assert!(service.fetch_video(LINK).await.is_success());
        assert!(transport.calls()[0].starts_with("https://api.codetabs.com/v1/proxy?quest="));
    }

    #[tokio::test]
    async fn test_no_relays_configured() {
        let transport = ScriptedTransport::default();
        let config = RetrievalConfig {
            relays: Vec::new(),
            ..RetrievalConfig::default()
        };
        let service = RetrievalService::new(transport.clone(), config);

        assert_eq!(
            service.fetch_video(LINK).await,
            ApiResult::failure(HIGH_TRAFFIC_MSG)
        );
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = RetrievalConfig::default();
        assert_eq!(config.attempt_timeout, Duration::from_secs(15));
        assert_eq!(config.relays.len(), 4);
        assert!(config.prefer_hd);
        assert!(config.is_rate_limited("Free Api Limit: 1 request/second."));
        assert!(config.is_rate_limited("quota exceeded"));
        assert!(!config.is_rate_limited("Video not found"));
        assert!(!config.is_rate_limited("rate limit"));
    }
}
