use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeriodError {
    #[error("Invalid month '{label}', expected YYYY-MM: {reason}")]
    InvalidFormat {
        label: String,
        reason: String
    }
}

impl PeriodError {
    pub fn invalid_format(label: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            label: label.to_string(),
            reason: reason.into()
        }
    }
}
