use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: set the {0} environment variable")]
    Missing(&'static str),
    #[error("Invalid gateway URL '{0}': must start with http:// or https://")]
    InvalidGatewayUrl(String),
    #[error("Request timeout must be at least one second")]
    InvalidTimeout
}
