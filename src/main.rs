mod config;
mod engine;
mod gateway;
mod models;
mod report;
mod types;

use std::io::stderr;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{Config, GatewayArgs};
use crate::engine::ReportEngine;
use crate::gateway::BraintreeGateway;
use crate::types::resolve_period;

#[derive(Parser)]
#[command(
    name = "braintree-report",
    version,
    about = "Writes monthly Braintree settlement and refund reports as CSV"
)]
struct Cli {
    /// Month to report on (YYYY-MM); repeat for several months. Defaults to the previous month.
    #[arg(short, long = "month", value_name = "YYYY-MM")]
    months: Vec<String>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, env = "BRAINTREE_REPORT_LOG", default_value = "info")]
    log_level: String,

    #[command(flatten)]
    gateway: GatewayArgs
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    //NOTE: A missing .env is fine, the variables may come from the real environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let config = Config::try_from(cli.gateway).context("Invalid configuration")?;
    debug!("Loaded {config:?}");

    let today = Local::now().date_naive();
    let periods = if cli.months.is_empty() {
        vec![resolve_period(None, today)?]
    } else {
        cli.months
            .iter()
            .map(|month| resolve_period(Some(month.as_str()), today))
            .collect::<Result<Vec<_>, _>>()?
    };

    let gateway = BraintreeGateway::new(&config).context("Failed to create Braintree gateway")?;
    let engine = ReportEngine::new(gateway, config.reports_dir.clone());

    for period in &periods {
        let summary = engine.generate(period).await?;
        info!(
            "{}: {} transactions written to {}, {} refunds written to {}",
            summary.label,
            summary.transactions,
            summary.paths.report.display(),
            summary.refunds,
            summary.paths.refunds.display()
        );
    }

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
