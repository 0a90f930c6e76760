use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{ProbeError, SiteProbe};

/// Single-shot GET probe backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Self::build_client(timeout)?;
        Ok(Self { client })
    }

    pub fn from_config(config: &crate::config::CheckConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.request_timeout)
    }

    pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(timeout).build()
    }
}

#[async_trait]
impl SiteProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<u16, ProbeError> {
        let parsed = Url::parse(url).map_err(|e| ProbeError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ProbeError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        match self.client.get(parsed).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(url, status, "Probe received response");
                Ok(status)
            }
            Err(e) if e.is_timeout() => {
                debug!(url, "Probe timed out");
                Err(ProbeError::Timeout {
                    url: url.to_string(),
                })
            }
            Err(e) => {
                debug!(url, error = %e, "Probe network error");
                Err(ProbeError::Network {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
