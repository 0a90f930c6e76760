mod http;

pub use http::HttpProbe;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },
    #[error("timeout fetching {url}")]
    Timeout { url: String },
}

/// Issues one request against a site and reports the status code it answered with.
///
/// Any response counts as success here, including 4xx and 5xx. Only a failure
/// to obtain a response is an error. Implementations must not retry.
#[async_trait]
pub trait SiteProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<u16, ProbeError>;
}
