//! HTTP client for the image converter API.
//!
//! Provides a small client that attaches the RapidAPI identification headers,
//! decodes the `{success, image, data, error}` envelope, and domain methods
//! (convert, resize, crop, rotate, flip, formats). The CLI uses this client directly.

pub mod api;

use anyhow::{Context, Result};
use imgconv_core::{ApiError, ClientConfig, Envelope};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-RapidAPI-Key";
pub const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Longest response body quoted in `ApiError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Successful envelope contents: the (still encoded) image and the typed `data`.
#[derive(Debug, Clone)]
pub struct Payload<T> {
    pub image: Option<String>,
    pub data: Option<T>,
}

/// HTTP client for the converter API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_host: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::Config("API key must not be empty".to_string()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
        })
    }

    /// Create client from environment, see [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(API_HOST_HEADER, self.api_host.as_str())
    }

    /// GET request. Decodes the envelope into its payload.
    pub async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> Result<Payload<T>> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "GET");
        let request = self.apply_auth(self.client.get(&url));
        self.send(path, request).await
    }

    /// POST multipart form. Decodes the envelope into its payload.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Payload<T>> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "POST multipart");
        let request = self.apply_auth(self.client.post(&url).multipart(form));
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Payload<T>> {
        let response = request.send().await.context("Failed to send request")?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        match decode_response(status, &body) {
            Ok(payload) => Ok(payload),
            Err(err) => {
                tracing::warn!(path = %path, status, error = %err, "API request failed");
                Err(err.into())
            }
        }
    }
}

/// Turn a raw response into a payload or the matching [`ApiError`].
///
/// The body is read as an untyped envelope first so that failure envelopes
/// surface their message even when `data` does not match `T`.
pub fn decode_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
) -> Result<Payload<T>, ApiError> {
    let ok_status = (200..300).contains(&status);

    let envelope: Envelope<serde_json::Value> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if ok_status => {
            return Err(ApiError::MalformedResponse(format!(
                "response is not a valid envelope: {}",
                e
            )))
        }
        Err(_) => {
            return Err(ApiError::Status {
                status,
                body: truncate_body(body),
            })
        }
    };

    if envelope.success && !ok_status {
        return Err(ApiError::Status {
            status,
            body: truncate_body(body),
        });
    }

    let (image, data) = envelope.into_payload(status)?;
    let data = match data {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(serde_json::from_value(value).map_err(|e| {
            ApiError::MalformedResponse(format!("unexpected data shape: {}", e))
        })?),
    };

    Ok(Payload { image, data })
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let mut out: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        out.push_str("...");
        out
    }
}

pub use api::{endpoints, ProcessedImage};
pub use imgconv_core::{
    ConvertData, ConvertParams, CropParams, Fit, FlipDirection, FormatInfo, ResizeData,
    ResizeParams, RotateParams,
};
