#![forbid(unsafe_code)]

pub mod check;
pub mod config;
pub mod probe;
pub mod runner;
pub mod site;
pub mod webhook;

pub use check::check_site;
pub use config::CheckConfig;
pub use probe::{HttpProbe, ProbeError, SiteProbe};
pub use runner::{RunError, RunReport, Runner};
pub use site::{CheckOutcome, CheckResult, Site, SiteError};
pub use webhook::{sign_payload, DeliveryOutcome, SiteStatus, WebhookNotifier, WebhookPayload};
