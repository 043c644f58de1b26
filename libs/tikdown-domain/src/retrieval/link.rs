use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default marker a link must contain to be accepted
pub const DEFAULT_DOMAIN_MARKER: &str = "tiktok.com";

/// Rejection of a link that does not point at the source platform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Link '{link}' does not contain '{marker}'")]
pub struct InvalidLink {
    pub link: String,
    pub marker: String,
}

/// A user-supplied video link that passed the domain check
///
/// VideoLink wraps the raw string unchanged so it can only be built through
/// [`VideoLink::parse`], which enforces the domain marker. Deserialization goes
/// through the same check with [`DEFAULT_DOMAIN_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct VideoLink(String);

impl VideoLink {
    /// Accept `raw` if it contains `marker` as a plain substring
    pub fn parse(raw: &str, marker: &str) -> Result<Self, InvalidLink> {
        if raw.contains(marker) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidLink {
                link: raw.to_string(),
                marker: marker.to_string(),
            })
        }
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VideoLink {
    type Error = InvalidLink;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw, DEFAULT_DOMAIN_MARKER)
    }
}

impl fmt::Display for VideoLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VideoLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
