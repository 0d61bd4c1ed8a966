use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionType};

/// Represents a single row of the monthly settlement report.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub braintree_id: String,
    pub order_id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(with = "created_at_format")]
    pub created_at: DateTime<Utc>,
    /// Signed amount; credits are negative.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub service_fee: Option<Decimal>,
    pub custom_description: String,
    pub status: String,
    pub payment_type: String,
    pub processor_auth_code: Option<String>,
    pub refund_id: Option<String>,
    pub settlement_batch_id: Option<String>,
    pub batch_date: String
}

impl From<&Transaction> for ReportRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            braintree_id: transaction.id.clone(),
            order_id: transaction.order_id.clone(),
            transaction_type: transaction.transaction_type.clone(),
            created_at: transaction.created_at,
            amount: transaction.signed_amount(),
            service_fee: transaction.service_fee,
            custom_description: transaction.custom_description(),
            status: transaction.status.clone(),
            payment_type: transaction.payment_instrument_type.clone(),
            processor_auth_code: transaction.processor_authorization_code.clone(),
            refund_id: transaction.refund_id.clone(),
            settlement_batch_id: transaction.settlement_batch_id.clone(),
            batch_date: transaction.batch_date()
        }
    }
}

/// A row of the refund report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRow {
    pub refund_id: String,
    pub custom_description: String
}

mod created_at_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&value, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(de::Error::custom)
    }
}
