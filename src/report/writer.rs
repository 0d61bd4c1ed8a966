use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::report::errors::ReportError;
use crate::report::{Report, REFUND_COLUMNS, REPORT_COLUMNS};

const REPORT_SUFFIX: &str = "braintree_api_report";
const REFUNDS_SUFFIX: &str = "braintree_api_report_refunds";

/// Locations of the two files written for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub report: PathBuf,
    pub refunds: PathBuf
}

impl ReportPaths {
    pub fn new(directory: &Path, label: &str) -> Self {
        Self {
            report: directory.join(format!("{label} {REPORT_SUFFIX}.csv")),
            refunds: directory.join(format!("{label} {REFUNDS_SUFFIX}.csv"))
        }
    }
}

/// Writes both report files for `label` into `directory`, replacing any
/// files from an earlier run.
///
/// The two writes are independent; a failure on the second leaves the
/// first in place.
pub fn write_reports(directory: &Path, label: &str, report: &Report) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(directory).map_err(|source| ReportError::CreateDirectory {
        path: directory.to_path_buf(),
        source
    })?;

    let paths = ReportPaths::new(directory, label);

    write_csv(&paths.report, &REPORT_COLUMNS, &report.rows)?;
    write_csv(&paths.refunds, &REFUND_COLUMNS, &report.refunds)?;

    Ok(paths)
}

/// Writes `header` explicitly so empty reports still carry their columns.
fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), ReportError> {
    let write_error = |source| ReportError::Write {
        path: path.to_path_buf(),
        source
    };

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_error)?;

    writer.write_record(header).map_err(write_error)?;

    for row in rows {
        writer.serialize(row).map_err(write_error)?;
    }

    writer.flush().map_err(|source| ReportError::Flush {
        path: path.to_path_buf(),
        source
    })?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());

    Ok(())
}
