use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info};

use crate::gateway::{fetch_settled_transactions, TransactionSearch};
use crate::report::{build_report, write_reports, ReportPaths};
use crate::types::ReportPeriod;

/// Outcome of one monthly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub label: String,
    pub transactions: usize,
    pub refunds: usize,
    pub paths: ReportPaths
}

/// Monthly report pipeline: fetch, build, write.
pub struct ReportEngine<S: TransactionSearch> {
    search: S,
    reports_dir: PathBuf
}

impl<S: TransactionSearch> ReportEngine<S> {
    /// Creates an engine that queries `search` and writes into `reports_dir`.
    pub fn new(search: S, reports_dir: PathBuf) -> Self {
        Self {
            search,
            reports_dir
        }
    }

    /// Generates both report files for `period`.
    ///
    /// Every transaction is fetched before anything is written, so a query
    /// failure leaves files from earlier runs untouched.
    pub async fn generate(&self, period: &ReportPeriod) -> anyhow::Result<ReportSummary> {
        info!("Generating report for {}...", period.label);
        debug!("Querying settled transactions for {period}");

        let timer = Instant::now();

        let transactions = fetch_settled_transactions(&self.search, period)
            .await
            .with_context(|| format!("Failed to fetch settled transactions for {}", period.label))?;

        let report = build_report(&transactions);

        let paths = write_reports(&self.reports_dir, &period.label, &report)
            .with_context(|| format!("Failed to write reports for {}", period.label))?;

        info!(
            "{} report generated successfully ({} transactions, {} refunds) in {:?}",
            period.label,
            report.rows.len(),
            report.refunds.len(),
            timer.elapsed()
        );

        Ok(ReportSummary {
            label: period.label.clone(),
            transactions: report.rows.len(),
            refunds: report.refunds.len(),
            paths
        })
    }
}
