//! TOML configuration for the catalog.
//!
//! ```toml
//! [endpoints]
//! remote_apis = "https://apix.example.com/api/v1"
//! local_apis = "https://apix.example.com/local.json"
//! sample_exchange = "https://code.example.com/samples/api/v1"
//!
//! [http]
//! user_agent = "apix-catalog/0.1"
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```
//!
//! Endpoint base URLs are stored without a trailing `/` so that request
//! paths can always be appended as `{base}/apis`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Base URLs of the upstream services.
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    /// Remote API registry; `/apis`, `/apis/{id}/resources` and
    /// `/apis/uids/{uid}` are resolved against it.
    pub remote_apis: String,
    /// Full URL of the static local manifest (`{"apis": [...]}`).
    pub local_apis: String,
    /// Sample exchange service; `/search/samples` is resolved against it.
    pub sample_exchange: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("apix-catalog/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Build a validated config directly from the three endpoint URLs.
    ///
    /// Used by tests and by programs embedding the catalog without a
    /// config file.
    pub fn from_endpoints(
        remote_apis: impl Into<String>,
        local_apis: impl Into<String>,
        sample_exchange: impl Into<String>,
    ) -> Result<Self> {
        let config = Config {
            endpoints: EndpointsConfig {
                remote_apis: remote_apis.into(),
                local_apis: local_apis.into(),
                sample_exchange: sample_exchange.into(),
            },
            http: HttpConfig::default(),
            server: ServerConfig::default(),
        };
        config.validated()
    }

    fn validated(mut self) -> Result<Self> {
        validate_endpoint("endpoints.remote_apis", &self.endpoints.remote_apis)?;
        validate_endpoint("endpoints.local_apis", &self.endpoints.local_apis)?;
        validate_endpoint("endpoints.sample_exchange", &self.endpoints.sample_exchange)?;

        self.endpoints.remote_apis = trim_base(&self.endpoints.remote_apis);
        self.endpoints.sample_exchange = trim_base(&self.endpoints.sample_exchange);
        // local_apis is a full document URL, not a base; keep it verbatim.

        if self.server.bind.trim().is_empty() {
            bail!("server.bind must not be empty");
        }

        Ok(self)
    }
}

fn validate_endpoint(key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        bail!("{} must not be empty", key);
    }
    let url = reqwest::Url::parse(value).with_context(|| format!("{} is not a valid URL", key))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("{} must use http or https, got '{}'", key, other),
    }
}

fn trim_base(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    config.validated()
}
