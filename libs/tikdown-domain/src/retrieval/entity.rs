//! Domain entities for video retrieval
//!
//! Every record here lives for a single request/response cycle. Nothing is
//! cached or persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::retrieval::link::VideoLink;

/// Upstream code for a successful extraction
pub const SUCCESS_CODE: i64 = 0;

/// Code used for every failure produced locally
pub const FAILURE_CODE: i64 = -1;

/// Author of a video
///
/// Field names follow the upstream payload; `unique_id` is the @handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unique_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar: String,
}

/// Metadata and media URLs for one video
///
/// Deserialized from the upstream `data` object. Only `play` is required:
/// other fields fall back to empty values when absent, null or oddly typed,
/// and counters the upstream omits stay `None` so callers can render them as
/// `"0"` instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(rename = "cover", default, deserialize_with = "null_as_default")]
    pub cover_url: String,

    /// Length in seconds
    #[serde(default, deserialize_with = "lenient_count")]
    pub duration: Option<u64>,

    /// Watermark-free variant
    #[serde(rename = "play")]
    pub play_url: String,

    /// High-quality watermark-free variant, when the upstream has one
    #[serde(rename = "hdplay", default, skip_serializing_if = "Option::is_none")]
    pub hd_play_url: Option<String>,

    #[serde(rename = "wmplay", default, deserialize_with = "null_as_default")]
    pub watermark_play_url: String,

    /// Audio track
    #[serde(rename = "music", default, deserialize_with = "null_as_default")]
    pub music_url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub author: Author,

    #[serde(default, deserialize_with = "lenient_count")]
    pub play_count: Option<u64>,

    #[serde(rename = "digg_count", default, deserialize_with = "lenient_count")]
    pub like_count: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub comment_count: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub share_count: Option<u64>,
}

impl VideoMetadata {
    /// Best watermark-free URL: the HD variant when present, else `play_url`
    pub fn best_play_url(&self) -> &str {
        self.hd_play_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.play_url)
    }
}

/// Outcome of a `fetch_video` call
///
/// Serializes to the upstream-compatible envelope:
/// `{ "code": 0, "msg": "success", "data": {...} }` or `{ "code": -1, "msg": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult {
    /// Upstream returned the video
    Success(VideoMetadata),
    /// Anything else, with a message meant for the user
    Failure { code: i64, msg: String },
}

impl ApiResult {
    /// Create a locally produced failure
    pub fn failure(msg: impl Into<String>) -> Self {
        Self::Failure {
            code: FAILURE_CODE,
            msg: msg.into(),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Success(_) => SUCCESS_CODE,
            Self::Failure { code, .. } => *code,
        }
    }

    pub fn msg(&self) -> &str {
        match self {
            Self::Success(_) => "success",
            Self::Failure { msg, .. } => msg,
        }
    }

    pub fn data(&self) -> Option<&VideoMetadata> {
        match self {
            Self::Success(video) => Some(video),
            Self::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Serialize)]
struct ApiResultWire<'a> {
    code: i64,
    msg: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a VideoMetadata>,
}

impl Serialize for ApiResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ApiResultWire {
            code: self.code(),
            msg: self.msg(),
            data: self.data(),
        }
        .serialize(serializer)
    }
}

/// One call to the extraction API
///
/// Built fresh for every `fetch_video` call. The timestamp only defeats
/// intermediate caches.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    endpoint: String,
    link: VideoLink,
    prefer_hd: bool,
    requested_at: DateTime<Utc>,
}

impl UpstreamRequest {
    /// Create a request stamped with the current time
    pub fn new(endpoint: impl Into<String>, link: VideoLink, prefer_hd: bool) -> Self {
        Self::at(endpoint, link, prefer_hd, Utc::now())
    }

    /// Create a request with an explicit timestamp
    pub fn at(
        endpoint: impl Into<String>,
        link: VideoLink,
        prefer_hd: bool,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            link,
            prefer_hd,
            requested_at,
        }
    }

    pub fn link(&self) -> &VideoLink {
        &self.link
    }

    pub fn requested_at(&self) -> &DateTime<Utc> {
        &self.requested_at
    }

    /// Full upstream URL: `{endpoint}?url=..&hd=1&_t=..`
    pub fn resolved_url(&self) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{}url={}",
            self.endpoint,
            separator,
            urlencoding::encode(self.link.as_str())
        );
        if self.prefer_hd {
            url.push_str("&hd=1");
        }
        url.push_str(&format!("&_t={}", self.requested_at.timestamp_millis()));
        url
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// The upstream sends ids as strings, but some mirrors send bare numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .map(|value| value.round() as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    })
}
