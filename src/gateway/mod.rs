mod braintree;
mod errors;
mod xml;

use quick_xml::escape::escape;

use crate::models::Transaction;
use crate::types::ReportPeriod;

pub use braintree::BraintreeGateway;
pub use errors::GatewayError;

const SETTLED: &str = "settled";

/// Filter for a transaction search: a `created_at` range and a status match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Inclusive lower bound, `MM/DD/YYYY HH:MM`.
    pub created_at_min: String,
    /// Inclusive upper bound, `MM/DD/YYYY HH:MM`.
    pub created_at_max: String,
    pub status: String
}

impl SearchCriteria {
    pub fn settled_within(period: &ReportPeriod) -> Self {
        Self {
            created_at_min: period.start_filter(),
            created_at_max: period.end_filter(),
            status: SETTLED.to_string()
        }
    }

    /// Renders the `<search>` request body, restricted to `ids` when non-empty.
    pub fn to_xml(&self, ids: &[String]) -> String {
        let mut body = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><search>");

        body.push_str(&format!(
            "<created-at><min>{}</min><max>{}</max></created-at>",
            escape(self.created_at_min.as_str()),
            escape(self.created_at_max.as_str())
        ));
        body.push_str(&format!("<status type=\"array\"><item>{}</item></status>", escape(self.status.as_str())));

        if !ids.is_empty() {
            body.push_str("<ids type=\"array\">");
            for id in ids {
                body.push_str(&format!("<item>{}</item>", escape(id.as_str())));
            }
            body.push_str("</ids>");
        }

        body.push_str("</search>");
        body
    }
}

/// The payment processor's transaction search.
///
/// Authentication, pagination and transport failures are the implementor's
/// concern; callers receive fully parsed records in processor order.
pub trait TransactionSearch {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Transaction>, GatewayError>;
}

/// Fetches every settled transaction created within `period`.
pub async fn fetch_settled_transactions<S: TransactionSearch>(search: &S, period: &ReportPeriod) -> Result<Vec<Transaction>, GatewayError> {
    search.search(&SearchCriteria::settled_within(period)).await
}
