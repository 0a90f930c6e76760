use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::check::check_site;
use crate::config::CheckConfig;
use crate::probe::{HttpProbe, SiteProbe};
use crate::site::{CheckOutcome, CheckResult, Site};
use crate::webhook::{DeliveryOutcome, WebhookNotifier, WebhookPayload};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("site check task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Everything one pass over the site list produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    /// One entry per site, in config order.
    pub results: Vec<CheckResult>,
    /// One entry per down site, in config order.
    pub deliveries: Vec<(String, DeliveryOutcome)>,
}

impl RunReport {
    pub fn up_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_up()).count()
    }

    pub fn down_count(&self) -> usize {
        self.results.len() - self.up_count()
    }

    pub fn failed_deliveries(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|(_, outcome)| !outcome.is_delivered())
            .count()
    }
}

/// Checks every site once and alerts the webhook about the ones that are down.
pub struct Runner {
    probe: Arc<dyn SiteProbe>,
    notifier: WebhookNotifier,
}

impl Runner {
    pub fn new(
        webhook: &str,
        secret: Option<String>,
        config: &CheckConfig,
    ) -> Result<Self, RunError> {
        let probe = HttpProbe::from_config(config)?;
        let client = Client::builder().timeout(config.webhook_timeout).build()?;
        let notifier = WebhookNotifier::new(client, webhook, config).with_secret(secret);
        Ok(Self::with_parts(Arc::new(probe), notifier))
    }

    pub fn with_parts(probe: Arc<dyn SiteProbe>, notifier: WebhookNotifier) -> Self {
        Self { probe, notifier }
    }

    pub async fn run(&self, sites: &[Site]) -> Result<RunReport, RunError> {
        let sites: Arc<[Site]> = sites.into();
        info!(sites = sites.len(), webhook = %self.notifier.url(), "Checking sites");

        let handles: Vec<_> = (0..sites.len())
            .map(|i| {
                let probe = Arc::clone(&self.probe);
                let sites = Arc::clone(&sites);
                tokio::spawn(async move { check_site(probe.as_ref(), &sites[i]).await })
            })
            .collect();

        // join_all yields in spawn order, so results line up with the config.
        let results = join_all(handles)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let timestamp = Utc::now();
        let mut deliveries = Vec::new();

        for result in &results {
            let name = &result.site.name;
            let url = result.site.url_or_empty();
            match &result.outcome {
                CheckOutcome::Healthy { status } => {
                    info!(site = %name, url, status, "{} is UP ({})", name, status);
                    continue;
                }
                CheckOutcome::UnexpectedStatus { status } => {
                    warn!(site = %name, url, status, "{} is DOWN ({})", name, status);
                }
                CheckOutcome::Unreachable { error } => {
                    warn!(site = %name, url, error = %error, "{} is DOWN (no response)", name);
                }
                CheckOutcome::Misconfigured { error } => {
                    error!(site = %name, error = %error, "{} is DOWN (invalid site entry)", name);
                }
            }

            let payload = WebhookPayload::down(result, timestamp);
            let outcome = self.notifier.notify(&payload).await;
            deliveries.push((name.clone(), outcome));
        }

        let report = RunReport {
            timestamp,
            results,
            deliveries,
        };
        info!(
            up = report.up_count(),
            down = report.down_count(),
            failed_deliveries = report.failed_deliveries(),
            "Run complete"
        );
        Ok(report)
    }
}
