mod report_row;
mod transaction;

use serde::{Deserialize, Serialize};

pub use report_row::{RefundRow, ReportRow};
pub use transaction::Transaction;

/// Processor transaction type tag.
///
/// Only `credit` changes how a row is reported; any other tag is carried
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Sale,
    Credit,
    Other(String)
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sale => "sale",
            Self::Credit => "credit",
            Self::Other(tag) => tag
        }
    }
}

impl From<&str> for TransactionType {
    fn from(value: &str) -> Self {
        match value {
            "sale" => Self::Sale,
            "credit" => Self::Credit,
            other => Self::Other(other.to_string())
        }
    }
}

impl From<String> for TransactionType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Other(tag) => tag,
            known => known.as_str().to_string()
        }
    }
}
