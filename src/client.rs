//! HTTP access to the upstream services.
//!
//! [`UpstreamClient`] wraps a shared `reqwest::Client` together with the
//! configured endpoint bases and exposes one JSON GET helper. Failures are
//! reported as [`FetchError`]; the fetchers above it decide how to degrade.

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, EndpointsConfig};

/// Upper bound on how much of an error body is kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request URL '{url}': {reason}")]
    Url { url: String, reason: String },
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Shared HTTP client bound to the configured upstream endpoints.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    endpoints: EndpointsConfig,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(config.http.user_agent.clone())
            .build()?;
        Ok(Self::with_http(http, config))
    }

    /// Use an already-built `reqwest::Client`.
    pub fn with_http(http: Client, config: &Config) -> Self {
        Self {
            http,
            endpoints: config.endpoints.clone(),
        }
    }

    pub fn endpoints(&self) -> &EndpointsConfig {
        &self.endpoints
    }

    /// `{remote_apis}/{path}`.
    pub fn remote_url(&self, path: &str) -> FetchResult<Url> {
        parse_url(&format!("{}/{}", self.endpoints.remote_apis, path))
    }

    /// `{remote_apis}/{segments...}`, each segment percent-encoded.
    pub fn remote_segments_url(&self, segments: &[&str]) -> FetchResult<Url> {
        let base = &self.endpoints.remote_apis;
        let mut url = parse_url(base)?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Url {
                url: base.clone(),
                reason: "cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn local_url(&self) -> FetchResult<Url> {
        parse_url(&self.endpoints.local_apis)
    }

    /// `{sample_exchange}/{path}`.
    pub fn sample_url(&self, path: &str) -> FetchResult<Url> {
        parse_url(&format!("{}/{}", self.endpoints.sample_exchange, path))
    }

    /// GET `url` and decode the JSON body.
    ///
    /// Non-2xx responses become [`FetchError::Status`] carrying the start of
    /// the response body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> FetchResult<T> {
        debug!(url = %url, "GET");
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status,
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn parse_url(raw: &str) -> FetchResult<Url> {
    Url::parse(raw).map_err(|e| FetchError::Url {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
