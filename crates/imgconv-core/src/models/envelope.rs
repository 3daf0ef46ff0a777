//! Response envelope shared by every endpoint, plus the per-operation `data` shapes.

use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// `{ success, image?, data?, error? }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub image: Option<String>,
    // No `default` attribute: it would require `T: Default`.
    pub data: Option<T>,
    #[serde(default, deserialize_with = "lenient_error")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Empty when the service sent null or an object instead of text.
    #[serde(default, deserialize_with = "lenient_message")]
    pub message: String,
    /// Service-specific code; seen as both numbers and strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
}

impl<T> Envelope<T> {
    /// Split a success envelope into its image and data parts; a failure
    /// envelope becomes `ApiError::Remote` tagged with `status`.
    pub fn into_payload(self, status: u16) -> Result<(Option<String>, Option<T>), ApiError> {
        if self.success {
            Ok((self.image, self.data))
        } else {
            let message = self.error.as_ref().map(|e| e.message.as_str());
            Err(ApiError::remote(status, message))
        }
    }
}

/// Decode the base64 `image` field. Tolerates surrounding whitespace and
/// a `data:<mime>;base64,` prefix.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
    let trimmed = encoded.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, b64)| b64)
            .ok_or_else(|| ApiError::MalformedResponse("data URI is not base64".to_string()))?,
        None => trimmed,
    };
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

/// `data` of a convert response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertData {
    pub original: SizeInfo,
    pub converted: SizeInfo,
    /// Size reduction in percent. The service sends either a number or a numeric string.
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub compression: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizeInfo {
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// `data` of a resize response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResizeData {
    #[serde(default)]
    pub original: Dimensions,
    #[serde(default)]
    pub resized: Dimensions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Dimensions {
    /// `WxH`, or `None` unless both sides are known.
    pub fn describe(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            _ => None,
        }
    }
}

/// `data` of the formats listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatsData {
    #[serde(default)]
    pub formats: Vec<FormatInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    pub format: String,
    /// Whatever else the service reports per format (mime type, capabilities...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn message_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn lenient_message<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(message_text).unwrap_or_default())
}

/// `error` is normally `{ message, code? }`, but a bare string is taken as the message.
fn lenient_error<'de, D>(deserializer: D) -> Result<Option<ErrorBody>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Object(mut map)) => Some(ErrorBody {
            message: map.remove("message").map(message_text).unwrap_or_default(),
            code: map.remove("code").filter(|c| !c.is_null()),
        }),
        Some(other) => Some(ErrorBody {
            message: message_text(other),
            code: None,
        }),
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    })
}
