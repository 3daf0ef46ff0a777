//! Error types module
//!
//! `ApiError` covers everything that can go wrong talking to the converter
//! service: parameters rejected locally, failure envelopes reported by the
//! service, unexpected HTTP statuses and payloads that do not decode.

/// Message used when the service reports a failure without saying why.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The service answered with `success: false`.
    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to decode image payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Build a `Remote` error, substituting a generic message when the
    /// service left it empty.
    pub fn remote(status: u16, message: Option<&str>) -> Self {
        let message = match message.map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => UNKNOWN_ERROR_MESSAGE.to_string(),
        };
        ApiError::Remote { status, message }
    }

    /// HTTP status attached to the error, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } | ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same request later might succeed (429 or 5xx).
    pub fn is_retryable(&self) -> bool {
        matches!(self.status(), Some(s) if s == 429 || (500..600).contains(&s))
    }
}
