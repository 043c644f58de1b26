//! # TikDown Relay Adapter
//!
//! Infrastructure for the TikDown domain:
//!
//! - [`infrastructure::ReqwestTransport`]: the `RelayTransport` port over reqwest
//! - [`config`]: `RetrievalConfig` overrides read from the environment
//!
//! ## Example
//!
//! ```rust,no_run
//! use tikdown_domain::RetrievalService;
//! use tikdown_relay::{config::config_from_env, infrastructure::ReqwestTransport};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let service = RetrievalService::new(ReqwestTransport::new()?, config_from_env()?);
//! let result = service.fetch_video("https://www.tiktok.com/@user/video/123").await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod infrastructure;

pub use config::{config_from_env, ConfigError};
pub use infrastructure::ReqwestTransport;
