use thiserror::Error;

const BODY_EXCERPT_LENGTH: usize = 200;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to [{url}] failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error
    },
    #[error("Authentication failed for [{url}], check the merchant ID and API keys")]
    Authentication {
        url: String
    },
    #[error("API keys are not authorized for [{url}]")]
    Authorization {
        url: String
    },
    #[error("Resource [{url}] was not found")]
    NotFound {
        url: String
    },
    #[error("Rate limit exceeded for [{url}]")]
    TooManyRequests {
        url: String
    },
    #[error("Gateway error [{status}] for [{url}]")]
    Server {
        url: String,
        status: u16
    },
    #[error("Unexpected status [{status}] for [{url}]: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String
    },
    #[error("Malformed XML response: {0}")]
    Xml(String),
    #[error("Response is missing <{element}> in <{parent}>")]
    MissingElement {
        element: String,
        parent: String
    },
    #[error("Invalid <{element}> value '{value}' for transaction [{transaction_id}]: {reason}")]
    InvalidValue {
        transaction_id: String,
        element: String,
        value: String,
        reason: String
    }
}

impl GatewayError {
    /// Maps a non-success HTTP status onto the matching error.
    pub fn from_status(status: u16, url: &str, body: &str) -> Self {
        let url = url.to_string();

        match status {
            401 => Self::Authentication { url },
            403 => Self::Authorization { url },
            404 => Self::NotFound { url },
            429 => Self::TooManyRequests { url },
            500..=599 => Self::Server { url, status },
            _ => Self::UnexpectedStatus {
                url,
                status,
                body: body.chars().take(BODY_EXCERPT_LENGTH).collect()
            }
        }
    }

    pub fn xml(error: impl std::fmt::Display) -> Self {
        Self::Xml(error.to_string())
    }

    pub fn missing_element(element: &str, parent: &str) -> Self {
        Self::MissingElement {
            element: element.to_string(),
            parent: parent.to_string()
        }
    }

    pub fn invalid_value(transaction_id: &str, element: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            transaction_id: transaction_id.to_string(),
            element: element.to_string(),
            value: value.to_string(),
            reason: reason.to_string()
        }
    }
}
