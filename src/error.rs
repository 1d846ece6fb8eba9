//! Error types for the kassa-gateway core
//!
//! This module provides the error type hierarchy using `thiserror`,
//! split along the lifecycle of a payment:
//!
//! - [`ConfigError`] - bad credentials/endpoint, fatal at construction
//! - [`ValidationError`] - malformed outbound request, caller fixes and retries
//! - [`VerificationError`] - inbound callback problems, surfaced to the caller
//! - [`StoreError`] - order-store backend failures

use thiserror::Error;

/// The main error type for kassa-gateway operations
#[derive(Error, Debug)]
pub enum Error {
    /// Credential/endpoint configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Outbound payment request validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Inbound callback verification errors
    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    /// Order store backend errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Credential and endpoint configuration errors
///
/// These are fatal at construction time: a client must never be built
/// from incomplete credentials.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required credential field is empty
    #[error("Missing credential field: {0}")]
    MissingField(&'static str),

    /// The gateway endpoint is not a well-formed URL
    #[error("Invalid gateway endpoint: {0}")]
    InvalidEndpoint(String),

    /// A required environment variable is not set
    #[error("Environment variable not set: {0}")]
    MissingEnv(&'static str),
}

/// Outbound payment request validation errors
///
/// Recoverable: the caller fixes the request and retries.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Amount is negative
    #[error("Amount must be non-negative, got {0}")]
    NegativeAmount(String),

    /// Order id is empty, too long, or contains disallowed characters
    #[error("Invalid order id: {0}")]
    InvalidOrderId(String),
}

/// Inbound callback verification errors
///
/// Surfaced to the caller, never silently swallowed. `BadSignature` and
/// `AmountMismatch` are security-relevant and must be logged by the host.
#[derive(Error, Debug)]
pub enum VerificationError {
    /// The claimed signature does not match the recomputed one
    #[error("Callback signature verification failed")]
    BadSignature,

    /// The order id is not known to the host's order store
    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    /// A duplicate callback claims a different amount than the processed one
    #[error("Amount mismatch for order {order_id}: processed {processed}, callback claims {claimed}")]
    AmountMismatch {
        /// The affected order id
        order_id: String,
        /// Amount recorded at first processing
        processed: String,
        /// Amount claimed by the duplicate callback
        claimed: String,
    },

    /// A required callback field is missing or unparseable
    #[error("Malformed callback field {field}: {reason}")]
    MalformedField {
        /// The offending field name
        field: &'static str,
        /// Why it could not be used
        reason: String,
    },

    /// The order store failed while checking idempotency
    #[error("Order store failure: {0}")]
    Store(#[from] StoreError),
}

/// Order store backend errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected or failed the operation
    #[error("Order store backend error: {0}")]
    Backend(String),
}

/// Result type alias for kassa-gateway operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }
}
