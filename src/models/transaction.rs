use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::TransactionType;

const DESCRIPTION_FIELD: &str = "description";
const BATCH_DATE_LENGTH: usize = 10;

/// A settled transaction as returned by the payment processor.
///
/// Optional fields mirror the processor's `nil` values; nothing here is
/// mutated after the record is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Processor-assigned transaction ID.
    pub id: String,
    /// Merchant-assigned order reference.
    pub order_id: Option<String>,
    pub transaction_type: TransactionType,
    pub created_at: DateTime<Utc>,
    /// Always non-negative as sent by the processor; see `signed_amount`.
    pub amount: Decimal,
    pub service_fee: Option<Decimal>,
    /// Merchant metadata attached at creation time.
    pub custom_fields: Option<HashMap<String, String>>,
    pub status: String,
    pub payment_instrument_type: String,
    pub processor_authorization_code: Option<String>,
    /// ID of the linked refund transaction, if any.
    pub refund_id: Option<String>,
    /// Leading `YYYY-MM-DD` is the settlement date.
    pub settlement_batch_id: Option<String>
}

impl Transaction {
    /// The amount with credits negated, so rows sum to net settled revenue.
    /// Every other type keeps its amount as sent.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Credit => -self.amount,
            _ => self.amount
        }
    }

    /// Settlement date prefix of the batch ID, or an empty string without one.
    pub fn batch_date(&self) -> String {
        self.settlement_batch_id
            .as_deref()
            .map(|batch_id| batch_id.chars().take(BATCH_DATE_LENGTH).collect())
            .unwrap_or_default()
    }

    /// The `description` custom field. Missing fields of any shape yield `""`.
    pub fn custom_description(&self) -> String {
        self.custom_fields
            .as_ref()
            .and_then(|fields| fields.get(DESCRIPTION_FIELD))
            .cloned()
            .unwrap_or_default()
    }
}
