//! Normalization of relay bodies into the upstream payload
//!
//! The JSON relay wraps the payload as `{ "contents": ... }`, where `contents`
//! is sometimes a JSON-encoded string and sometimes an already-parsed object.
//! This is the only place that knows about it.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::entity::{VideoMetadata, SUCCESS_CODE};
use super::error::{RelayError, Result};
use super::relay::ResponseShape;

/// The extraction API's response: `{ code, msg, processed_time?, data? }`
///
/// `data` stays raw until the code says success, so failure payloads with an
/// unexpected `data` shape still parse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamEnvelope {
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub msg: String,
    #[serde(default)]
    pub processed_time: Option<f64>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl UpstreamEnvelope {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Decode `data` into video metadata
    ///
    /// # Errors
    ///
    /// Returns `RelayError::IncompletePayload` if `data` is absent, null, or
    /// lacks a usable `play` URL
    pub fn into_metadata(self) -> Result<VideoMetadata> {
        match self.data {
            None | Some(Value::Null) => Err(RelayError::incomplete_payload("missing data")),
            Some(data) => serde_json::from_value(data)
                .map_err(|e| RelayError::incomplete_payload(e.to_string())),
        }
    }
}

#[derive(Deserialize)]
struct RelayEnvelope {
    #[serde(default)]
    contents: Value,
}

/// Parse a relay body into the upstream envelope according to `shape`
///
/// # Errors
///
/// - `RelayError::InvalidJson` if the body or the wrapped contents do not parse
/// - `RelayError::MissingContents` if an enveloped body has no contents
pub fn normalize(shape: ResponseShape, body: &str) -> Result<UpstreamEnvelope> {
    match shape {
        ResponseShape::Raw => Ok(serde_json::from_str(body)?),
        ResponseShape::Enveloped => {
            let wrapper: RelayEnvelope = serde_json::from_str(body)?;
            match wrapper.contents {
                Value::Null => Err(RelayError::MissingContents),
                Value::String(text) if text.is_empty() => Err(RelayError::MissingContents),
                Value::String(text) => Ok(serde_json::from_str(&text)?),
                contents => Ok(serde_json::from_value(contents)?),
            }
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
