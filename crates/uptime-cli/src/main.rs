mod config;

use std::path::Path;

use clap::Parser;
use console::style;
use tracing_subscriber::{fmt, EnvFilter};

use uptime_core::{CheckConfig, RunReport, Runner};

use crate::config::{AppConfig, LogFormat};

const CONFIG_PATH: &str = "config.json";

fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");

    if GIT_HASH.is_empty() {
        VERSION
    } else {
        // Built once at startup; clap needs a 'static str.
        Box::leak(format!("{VERSION} ({GIT_HASH})").into_boxed_str())
    }
}

/// Check every site in ./config.json once and alert the webhook about the ones that are down.
#[derive(Parser)]
#[command(name = "uptime-check", version = version_string(), about)]
struct Cli {}

#[tokio::main]
async fn main() {
    let _cli = Cli::parse();

    let app_config = match AppConfig::load(Path::new(CONFIG_PATH)) {
        Ok(c) => {
            init_tracing(c.log_format);
            tracing::info!(path = CONFIG_PATH, sites = c.sites.len(), "Loaded config file");
            c
        }
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let runner = match Runner::new(
        &app_config.webhook,
        app_config.webhook_secret.clone(),
        &CheckConfig::default(),
    ) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            std::process::exit(1);
        }
    };

    match runner.run(&app_config.sites).await {
        Ok(report) => print_summary(&report),
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            std::process::exit(1);
        }
    }
}

fn print_summary(report: &RunReport) {
    let down = report.down_count();
    let down_label = format!("{} down", down);
    let down_styled = if down == 0 {
        style(down_label).green()
    } else {
        style(down_label).red().bold()
    };

    let mut line = format!(
        "{} {} checked, {}, {}",
        style("uptime-check").bold(),
        report.results.len(),
        style(format!("{} up", report.up_count())).green(),
        down_styled,
    );
    let failed = report.failed_deliveries();
    if failed > 0 {
        line.push_str(&format!(
            ", {}",
            style(format!("{} webhook deliveries failed", failed)).yellow()
        ));
    }
    line.push_str(&format!(
        "  {}",
        style(report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")).dim()
    ));
    println!("{line}");
}

fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_format {
        LogFormat::Json => {
            fmt().with_env_filter(filter).json().init();
        }
        LogFormat::Pretty => {
            fmt().with_env_filter(filter).init();
        }
    }
}
