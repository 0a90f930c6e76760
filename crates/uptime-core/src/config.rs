use std::time::Duration;

/// Timeouts and client settings for a single check run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// HTTP request timeout for site probes (default: 10s).
    pub request_timeout: Duration,
    /// HTTP request timeout for webhook deliveries (default: 10s).
    pub webhook_timeout: Duration,
    /// User-Agent sent with webhook deliveries. Probes send no custom headers.
    pub user_agent: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            webhook_timeout: Duration::from_secs(10),
            user_agent: format!("uptime-check/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CheckConfig {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_webhook_timeout(mut self, timeout: Duration) -> Self {
        self.webhook_timeout = timeout;
        self
    }
}
