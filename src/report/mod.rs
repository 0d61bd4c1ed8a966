mod builder;
mod errors;
mod writer;

pub use builder::{build_report, Report};
pub use writer::{write_reports, ReportPaths};

/// Settlement report header; matches the field order of `ReportRow`.
pub const REPORT_COLUMNS: [&str; 13] = [
    "braintree_id",
    "order_id",
    "type",
    "created_at",
    "amount",
    "service_fee",
    "custom_description",
    "status",
    "payment_type",
    "processor_auth_code",
    "refund_id",
    "settlement_batch_id",
    "batch_date"
];

/// Refund report header; matches the field order of `RefundRow`.
pub const REFUND_COLUMNS: [&str; 2] = ["refund_id", "custom_description"];
