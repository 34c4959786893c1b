//! Ping endpoint client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, StatusCode};
use sitekit_core::ReloadConfig;

/// Opaque content version returned by the ping endpoint.
pub type Token = String;

/// Outcome of a single probe.
pub type ProbeResult = Result<Token, ProbeError>;

/// Why a probe failed. Every variant is treated as "offline".
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("ping request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("ping endpoint answered {0}")]
    Status(StatusCode),

    #[error("failed to read ping body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Source of content tokens.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Fetch the current content token.
    async fn ping(&self) -> ProbeResult;
}

/// Probe that issues `GET` requests against the development server.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: String,
}

impl HttpProbe {
    /// Create a probe for the given ping URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a probe from reload configuration.
    pub fn from_config(config: &ReloadConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.ping_url(), config.request_timeout())
    }

    /// The URL being probed.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn ping(&self) -> ProbeResult {
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(ProbeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status));
        }

        // Servers often append a newline to the token
        let body = response.text().await.map_err(ProbeError::Body)?;
        Ok(body.trim().to_string())
    }
}
