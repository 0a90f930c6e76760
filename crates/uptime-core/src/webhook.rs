//! Webhook notifications for down sites.
//!
//! Each down event becomes one [`WebhookPayload`], POSTed once by the
//! [`WebhookNotifier`]. Delivery problems are logged and reported back as a
//! [`DeliveryOutcome`], never as an error.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Serialize, Serializer};
use sha2::Sha256;
use tracing::{debug, error, warn};

use crate::site::CheckResult;

pub const SIGNATURE_HEADER: &str = "X-Uptime-Signature-256";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SiteStatus {
    Up,
    Down,
}

/// The JSON body POSTed to the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub site_name: String,
    pub site_url: String,
    pub status: SiteStatus,
    pub http_code: Option<u16>,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
}

impl WebhookPayload {
    pub fn down(result: &CheckResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            site_name: result.site.name.clone(),
            site_url: result.site.url_or_empty().to_string(),
            status: SiteStatus::Down,
            http_code: result.status_code(),
            timestamp,
        }
    }
}

fn serialize_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// How a single webhook delivery ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { status: u16 },
    Rejected { status: u16, body: String },
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

pub struct WebhookNotifier {
    client: Client,
    url: String,
    secret: Option<String>,
    timeout: Duration,
    user_agent: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: impl Into<String>, config: &crate::config::CheckConfig) -> Self {
        Self {
            client,
            url: url.into(),
            secret: None,
            timeout: config.webhook_timeout,
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the payload once. Never retries.
    pub async fn notify(&self, payload: &WebhookPayload) -> DeliveryOutcome {
        let body = match serde_json::to_vec(payload) {
            Ok(b) => b,
            Err(e) => {
                error!(error = %e, "Failed to serialize webhook payload");
                return DeliveryOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let mut req = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("User-Agent", self.user_agent.as_str())
            .timeout(self.timeout);

        if let Some(secret) = self.secret.as_deref() {
            req = req.header(SIGNATURE_HEADER, format!("sha256={}", sign_payload(&body, secret)));
        }

        match req.body(body).send().await {
            Ok(resp) if resp.status().is_success() => {
                let status = resp.status().as_u16();
                debug!(url = %self.url, site = %payload.site_name, status, "Webhook delivered");
                DeliveryOutcome::Delivered { status }
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                warn!(
                    url = %self.url,
                    site = %payload.site_name,
                    status,
                    body = %body,
                    "Webhook endpoint returned {}",
                    status
                );
                DeliveryOutcome::Rejected { status, body }
            }
            Err(e) => {
                error!(
                    url = %self.url,
                    site = %payload.site_name,
                    error = %e,
                    "Webhook delivery failed"
                );
                DeliveryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

pub fn sign_payload(body: &[u8], secret: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
