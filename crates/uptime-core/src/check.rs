use crate::probe::SiteProbe;
use crate::site::{CheckOutcome, CheckResult, Site};

/// Probes one site and classifies the answer against its expected status set.
pub async fn check_site(probe: &dyn SiteProbe, site: &Site) -> CheckResult {
    let outcome = match site.target() {
        Err(error) => CheckOutcome::Misconfigured { error },
        Ok((url, expected)) => match probe.probe(url).await {
            Ok(status) if expected.contains(&status) => CheckOutcome::Healthy { status },
            Ok(status) => CheckOutcome::UnexpectedStatus { status },
            Err(error) => CheckOutcome::Unreachable { error },
        },
    };

    CheckResult {
        site: site.clone(),
        outcome,
    }
}
