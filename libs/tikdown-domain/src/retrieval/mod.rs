//! Retrieval domain module
//!
//! This module contains the entities and the relay fallback routine that turns
//! a pasted link into an [`ApiResult`].

mod entity;
mod envelope;
mod error;
mod link;
mod relay;
mod service;

pub use entity::{ApiResult, Author, UpstreamRequest, VideoMetadata, FAILURE_CODE, SUCCESS_CODE};
pub use envelope::{normalize, UpstreamEnvelope};
pub use error::{RelayError, Result};
pub use link::{InvalidLink, VideoLink, DEFAULT_DOMAIN_MARKER};
pub use relay::{RelayStrategy, ResponseShape};
pub use service::{
    RetrievalConfig, RetrievalService, DEFAULT_API_ENDPOINT, HIGH_TRAFFIC_MSG, INVALID_LINK_MSG,
    RATE_LIMITED_MSG, UNREADABLE_VIDEO_MSG,
};
