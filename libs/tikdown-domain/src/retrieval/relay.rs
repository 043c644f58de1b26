//! Public CORS relays used to reach the extraction API
//!
//! Each strategy is a pure URL rewrite plus the convention the relay uses to
//! hand back the upstream body.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a relay returns the upstream payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Body is the upstream payload, verbatim
    Raw,
    /// Body is `{ "contents": ... }` with the payload as a string or an object
    Enveloped,
}

/// A relay proxy and the way it rewrites the target URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayStrategy {
    /// `api.allorigins.win/raw`
    #[serde(rename = "allorigins-raw")]
    AllOriginsRaw,
    /// `api.allorigins.win/get`, JSON envelope
    #[serde(rename = "allorigins-json")]
    AllOriginsJson,
    /// `corsproxy.io`
    #[serde(rename = "corsproxy")]
    CorsProxy,
    /// `api.codetabs.com`
    #[serde(rename = "codetabs")]
    CodeTabs,
}

impl RelayStrategy {
    /// Fallback order: earlier entries are tried first
    pub const DEFAULT_ORDER: [RelayStrategy; 4] = [
        RelayStrategy::AllOriginsRaw,
        RelayStrategy::AllOriginsJson,
        RelayStrategy::CorsProxy,
        RelayStrategy::CodeTabs,
    ];

    /// Rewrite the upstream URL into this relay's URL
    pub fn proxied_url(&self, target: &str) -> String {
        let target = urlencoding::encode(target);
        match self {
            Self::AllOriginsRaw => format!("https://api.allorigins.win/raw?url={}", target),
            Self::AllOriginsJson => format!("https://api.allorigins.win/get?url={}", target),
            Self::CorsProxy => format!("https://corsproxy.io/?{}", target),
            Self::CodeTabs => format!("https://api.codetabs.com/v1/proxy?quest={}", target),
        }
    }

    pub fn response_shape(&self) -> ResponseShape {
        match self {
            Self::AllOriginsJson => ResponseShape::Enveloped,
            _ => ResponseShape::Raw,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AllOriginsRaw => "allorigins-raw",
            Self::AllOriginsJson => "allorigins-json",
            Self::CorsProxy => "corsproxy",
            Self::CodeTabs => "codetabs",
        }
    }
}

impl fmt::Display for RelayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RelayStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DEFAULT_ORDER
            .into_iter()
            .find(|strategy| strategy.name() == s.trim())
            .ok_or_else(|| format!("unknown relay '{}'", s))
    }
}
