//! Configuration module
//!
//! Client settings come from the environment (optionally seeded from a
//! `.env` file). Only the API key is required.

use std::env;

use crate::error::ApiError;

pub const DEFAULT_API_HOST: &str = "image-converter-api3.p.rapidapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings needed to talk to the converter service.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Value of the `X-RapidAPI-Host` header.
    pub api_host: String,
    /// Scheme and authority requests are sent to, without trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Config with the given key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: DEFAULT_API_HOST.to_string(),
            base_url: format!("https://{}", DEFAULT_API_HOST),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load from the process environment: IMGCONV_API_KEY (or RAPIDAPI_KEY),
    /// IMGCONV_API_HOST, IMGCONV_API_URL, IMGCONV_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same rules as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_blank("IMGCONV_API_KEY")
            .or_else(|| non_blank("RAPIDAPI_KEY"))
            .ok_or_else(|| {
                ApiError::Config("Missing API key. Set IMGCONV_API_KEY or RAPIDAPI_KEY".to_string())
            })?;

        let api_host = non_blank("IMGCONV_API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        let base_url = non_blank("IMGCONV_API_URL")
            .unwrap_or_else(|| format!("https://{}", api_host))
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match non_blank("IMGCONV_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ApiError::Config(format!(
                        "IMGCONV_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        tracing::debug!(api_host = %api_host, base_url = %base_url, "Loaded client configuration");

        Ok(Self {
            api_key: api_key.trim().to_string(),
            api_host,
            base_url,
            timeout_secs,
        })
    }
}
