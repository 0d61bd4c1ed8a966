use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Could not create report directory [{path}]: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },
    #[error("Could not write report [{path}]: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error
    },
    #[error("Could not flush report [{path}]: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error
    }
}
