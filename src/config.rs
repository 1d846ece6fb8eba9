//! Gateway configuration
//!
//! Credentials come from environment variables, whatever the host's
//! actual secret source is (dotenv file, container env, secret manager).
//! Nothing sensitive is ever hardcoded or logged.
//!
//! # Environment Variables
//!
//! - `KASSA_MERCHANT_ID` (required): merchant identifier
//! - `KASSA_SECRET_1` (required): outbound payload signing key
//! - `KASSA_SECRET_2` (required): callback verification key
//! - `KASSA_ENDPOINT` (optional): checkout endpoint, defaults to the
//!   public FreeKassa pay URL

use std::env;

use tracing::warn;

use crate::error::ConfigError;
use crate::gateway::Credentials;

/// Default checkout endpoint
pub const DEFAULT_ENDPOINT: &str = "https://pay.freekassa.ru/";

/// Gateway configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Validated merchant credentials
    pub credentials: Credentials,
}

impl GatewayConfig {
    /// Load and validate configuration from environment variables
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingEnv`] when a required variable is unset,
    /// plus everything [`Credentials::new`] rejects.
    pub fn from_env() -> Result<Self, ConfigError> {
        let merchant_id =
            env::var("KASSA_MERCHANT_ID").map_err(|_| ConfigError::MissingEnv("KASSA_MERCHANT_ID"))?;
        let secret_key1 =
            env::var("KASSA_SECRET_1").map_err(|_| ConfigError::MissingEnv("KASSA_SECRET_1"))?;
        let secret_key2 =
            env::var("KASSA_SECRET_2").map_err(|_| ConfigError::MissingEnv("KASSA_SECRET_2"))?;
        let endpoint = env::var("KASSA_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        if secret_key1 == secret_key2 {
            warn!("SECURITY WARNING: KASSA_SECRET_1 and KASSA_SECRET_2 are identical");
        }
        if secret_key1.len() < 8 || secret_key2.len() < 8 {
            warn!("SECURITY WARNING: gateway secret shorter than 8 characters");
        }

        let credentials = Credentials::new(merchant_id, secret_key1, secret_key2, &endpoint)?;
        Ok(Self { credentials })
    }

    /// Create a test configuration (for testing only)
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            credentials: Credentials::new("M1", "abc", "xyz", DEFAULT_ENDPOINT)
                .expect("static test credentials"),
        }
    }
}
