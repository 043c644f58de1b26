//! Environment-driven configuration
//!
//! Every variable is optional; unset variables keep the `RetrievalConfig`
//! defaults.
//!
//! | Variable                       | Meaning                                  |
//! |--------------------------------|------------------------------------------|
//! | `TIKDOWN_API_ENDPOINT`         | Extraction API endpoint                  |
//! | `TIKDOWN_ATTEMPT_TIMEOUT_SECS` | Per-relay bound in seconds (> 0)         |
//! | `TIKDOWN_PREFER_HD`            | `true`/`false`, request the HD variant   |
//! | `TIKDOWN_RELAYS`               | Comma-separated relay names, in order    |

use std::time::Duration;

use thiserror::Error;
use tikdown_domain::{RelayStrategy, RetrievalConfig};
use tracing::info;

pub const ENV_API_ENDPOINT: &str = "TIKDOWN_API_ENDPOINT";
pub const ENV_ATTEMPT_TIMEOUT_SECS: &str = "TIKDOWN_ATTEMPT_TIMEOUT_SECS";
pub const ENV_PREFER_HD: &str = "TIKDOWN_PREFER_HD";
pub const ENV_RELAYS: &str = "TIKDOWN_RELAYS";

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be used
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Load `.env` if present, then read overrides from the process environment
pub fn config_from_env() -> Result<RetrievalConfig, ConfigError> {
    dotenvy::dotenv().ok();
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Build a configuration from an arbitrary variable lookup
pub fn config_from_lookup<F>(lookup: F) -> Result<RetrievalConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = RetrievalConfig::default();

    if let Some(endpoint) = lookup(ENV_API_ENDPOINT) {
        let endpoint = endpoint.trim();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::invalid(
                ENV_API_ENDPOINT,
                endpoint,
                "expected an http(s) URL",
            ));
        }
        config.api_endpoint = endpoint.to_string();
    }

    if let Some(raw) = lookup(ENV_ATTEMPT_TIMEOUT_SECS) {
        let secs = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::invalid(ENV_ATTEMPT_TIMEOUT_SECS, &raw, e.to_string()))?;
        if secs == 0 {
            return Err(ConfigError::invalid(
                ENV_ATTEMPT_TIMEOUT_SECS,
                &raw,
                "must be greater than zero",
            ));
        }
        config.attempt_timeout = Duration::from_secs(secs);
    }

    if let Some(raw) = lookup(ENV_PREFER_HD) {
        config.prefer_hd = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => return Err(ConfigError::invalid(ENV_PREFER_HD, &raw, "expected a boolean")),
        };
    }

    if let Some(raw) = lookup(ENV_RELAYS) {
        let relays = raw
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| name.parse::<RelayStrategy>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| ConfigError::invalid(ENV_RELAYS, &raw, reason))?;
        if relays.is_empty() {
            return Err(ConfigError::invalid(ENV_RELAYS, &raw, "no relay listed"));
        }
        config.relays = relays;
    }

    info!(
        api_endpoint = %config.api_endpoint,
        attempt_timeout_secs = config.attempt_timeout.as_secs(),
        prefer_hd = config.prefer_hd,
        relays = ?config.relays,
        "Retrieval configuration loaded"
    );

    Ok(config)
}
