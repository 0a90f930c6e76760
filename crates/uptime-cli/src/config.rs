//! JSON configuration file schema and loading.
//!
//! Example `config.json`:
//!
//! ```json
//! {
//!   "webhook": "https://hooks.example.com/uptime",
//!   "webhookSecret": "optional-signing-key",
//!   "logFormat": "pretty",
//!   "sites": [
//!     { "name": "Homepage", "url": "https://example.com", "expectedStatus": [200] },
//!     { "name": "API", "url": "https://api.example.com/health", "expectedStatus": [200, 204] }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use uptime_core::Site;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub webhook: String,

    pub sites: Vec<Site>,

    /// Optional HMAC-SHA256 key for the `X-Uptime-Signature-256` header.
    #[serde(default)]
    pub webhook_secret: Option<String>,

    #[serde(default)]
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook.trim().is_empty() {
            return Err(ConfigError::Invalid("webhook must not be empty".into()));
        }

        let parsed = url::Url::parse(&self.webhook).map_err(|e| {
            ConfigError::Invalid(format!("Invalid webhook URL: {} ({})", self.webhook, e))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "Webhook URL must use http or https: {}",
                self.webhook
            )));
        }

        Ok(())
    }
}
