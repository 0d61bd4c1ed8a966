use crate::models::{RefundRow, ReportRow, Transaction};

/// Refund IDs this short or shorter are processor placeholders, not real IDs.
const REFUND_ID_MIN_EXCLUSIVE: usize = 4;

/// Both tables of a monthly run, held in memory until written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// One row per fetched transaction, in fetch order.
    pub rows: Vec<ReportRow>,
    /// Rows that reference a refund, projected to ID and description.
    pub refunds: Vec<RefundRow>
}

/// Projects transactions into the settlement report and its refund subset.
pub fn build_report(transactions: &[Transaction]) -> Report {
    let rows: Vec<ReportRow> = transactions.iter().map(ReportRow::from).collect();

    let refunds = rows
        .iter()
        .filter_map(|row| {
            row.refund_id
                .as_ref()
                .filter(|refund_id| refund_id.chars().count() > REFUND_ID_MIN_EXCLUSIVE)
                .map(|refund_id| RefundRow {
                    refund_id: refund_id.clone(),
                    custom_description: row.custom_description.clone()
                })
        })
        .collect();

    Report { rows, refunds }
}
