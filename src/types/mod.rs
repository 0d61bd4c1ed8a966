mod errors;
mod period;
#[cfg(test)]
mod tests;

pub use period::{resolve_period, ReportPeriod};
