//! Merchant credentials
//!
//! The credential store is validated once at construction and immutable
//! afterwards. Secrets are never exposed through `Debug`.

use std::fmt;

use url::Url;

use crate::error::ConfigError;

/// Immutable merchant credentials for one gateway account
///
/// Two secrets, matching the gateway's split-key scheme:
///
/// - `secret_key1` signs outbound payment payloads
/// - `secret_key2` verifies inbound callback signatures
#[derive(Clone)]
pub struct Credentials {
    merchant_id: String,
    secret_key1: String,
    secret_key2: String,
    api_endpoint: Url,
}

impl Credentials {
    /// Build a credential store, validating every field
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if any field is empty and
    /// [`ConfigError::InvalidEndpoint`] if the endpoint is not a
    /// well-formed URL.
    pub fn new(
        merchant_id: impl Into<String>,
        secret_key1: impl Into<String>,
        secret_key2: impl Into<String>,
        api_endpoint: &str,
    ) -> Result<Self, ConfigError> {
        let merchant_id = merchant_id.into();
        let secret_key1 = secret_key1.into();
        let secret_key2 = secret_key2.into();

        if merchant_id.is_empty() {
            return Err(ConfigError::MissingField("merchant_id"));
        }
        if secret_key1.is_empty() {
            return Err(ConfigError::MissingField("secret_key1"));
        }
        if secret_key2.is_empty() {
            return Err(ConfigError::MissingField("secret_key2"));
        }

        let api_endpoint =
            Url::parse(api_endpoint).map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))?;

        Ok(Self {
            merchant_id,
            secret_key1,
            secret_key2,
            api_endpoint,
        })
    }

    /// Merchant identifier as registered with the gateway
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Secret key for signing outbound payment payloads
    pub fn secret_key1(&self) -> &str {
        &self.secret_key1
    }

    /// Secret key for verifying inbound callback signatures
    pub fn secret_key2(&self) -> &str {
        &self.secret_key2
    }

    /// Gateway checkout/API endpoint
    pub fn api_endpoint(&self) -> &Url {
        &self.api_endpoint
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("merchant_id", &self.merchant_id)
            .field("secret_key1", &"<redacted>")
            .field("secret_key2", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint.as_str())
            .finish()
    }
}
