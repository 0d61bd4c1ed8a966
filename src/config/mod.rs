//! Gateway credentials and run settings.
//!
//! Values come from command-line flags with environment variable fallbacks
//! (a `.env` file is loaded by the binary first). Everything is validated
//! into a `Config` once at startup and then passed explicitly.

mod errors;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, ValueEnum};

pub use errors::ConfigError;

pub const MERCHANT_ID_VAR: &str = "mercato_braintree_merchant_id";
pub const PUBLIC_KEY_VAR: &str = "mercato_braintree_public_key";
pub const PRIVATE_KEY_VAR: &str = "mercato_braintree_private_key";

/// Braintree environment the credentials belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Production,
    Sandbox
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.braintreegateway.com:443",
            Environment::Sandbox => "https://api.sandbox.braintreegateway.com:443"
        }
    }
}

/// Gateway settings accepted on the command line.
#[derive(Debug, Clone, Args)]
pub struct GatewayArgs {
    /// Braintree merchant ID
    #[arg(long, env = "mercato_braintree_merchant_id", hide_env_values = true)]
    pub merchant_id: Option<String>,

    /// Braintree public API key
    #[arg(long, env = "mercato_braintree_public_key", hide_env_values = true)]
    pub public_key: Option<String>,

    /// Braintree private API key
    #[arg(long, env = "mercato_braintree_private_key", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Braintree environment
    #[arg(long, env = "BRAINTREE_ENVIRONMENT", value_enum, default_value = "production")]
    pub environment: Environment,

    /// Override the gateway base URL
    #[arg(long, env = "BRAINTREE_GATEWAY_URL", hide = true)]
    pub gateway_url: Option<String>,

    /// Directory the reports are written to
    #[arg(long, env = "BRAINTREE_REPORTS_DIR", default_value = "reports")]
    pub reports_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(long, env = "BRAINTREE_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64
}

/// Validated run configuration.
#[derive(Clone)]
pub struct Config {
    pub merchant_id: String,
    pub public_key: String,
    pub private_key: String,
    pub environment: Environment,
    pub gateway_url: Option<String>,
    pub reports_dir: PathBuf,
    pub timeout: Duration
}

impl Config {
    /// The gateway URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.gateway_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

impl TryFrom<GatewayArgs> for Config {
    type Error = ConfigError;

    fn try_from(args: GatewayArgs) -> Result<Self, Self::Error> {
        let merchant_id = required(args.merchant_id, MERCHANT_ID_VAR)?;
        let public_key = required(args.public_key, PUBLIC_KEY_VAR)?;
        let private_key = required(args.private_key, PRIVATE_KEY_VAR)?;

        let gateway_url = args.gateway_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        if let Some(url) = &gateway_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidGatewayUrl(url.clone()));
            }
        }

        if args.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(Self {
            merchant_id,
            public_key,
            private_key,
            environment: args.environment,
            gateway_url,
            reports_dir: args.reports_dir,
            timeout: Duration::from_secs(args.timeout_secs)
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Config")
            .field("merchant_id", &self.merchant_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("environment", &self.environment)
            .field("gateway_url", &self.gateway_url)
            .field("reports_dir", &self.reports_dir)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required(value: Option<String>, variable: &'static str) -> Result<String, ConfigError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(variable))
}
