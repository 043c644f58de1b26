//! # TikDown Domain Layer
//!
//! This crate contains the retrieval logic for TikDown: turning a pasted video
//! link into watermark-free media URLs and metadata by calling a third-party
//! extraction API through a list of public relay proxies. It follows hexagonal
//! architecture principles:
//!
//! - **Entities**: Core value records (VideoLink, VideoMetadata, ApiResult)
//! - **Ports**: Trait definitions for external dependencies (RelayTransport)
//! - **Services**: The relay fallback routine (RetrievalService)
//!
//! ## Architecture
//!
//! This layer has NO dependency on an HTTP client. Network access is expressed
//! as the [`RelayTransport`] port and implemented by adapter crates.
//!
//! ## Example
//!
//! ```rust
//! use tikdown_domain::{ApiResult, RelayTransport, RetrievalService};
//!
//! async fn example<T: RelayTransport>(service: RetrievalService<T>) {
//!     match service.fetch_video("https://www.tiktok.com/@user/video/123").await {
//!         ApiResult::Success(video) => println!("Play: {}", video.play_url),
//!         ApiResult::Failure { msg, .. } => println!("Error: {}", msg),
//!     }
//! }
//! ```

pub mod format;
pub mod ports;
pub mod retrieval;

// Re-export commonly used types
pub use format::{format_compact, format_count};
pub use ports::{RelayResponse, RelayTransport};
pub use retrieval::{
    ApiResult, Author, RelayError, RelayStrategy, RetrievalConfig, RetrievalService, VideoLink,
    VideoMetadata,
};
