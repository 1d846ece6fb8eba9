//! Callback notifications and payment events
//!
//! [`CallbackNotification`] is the raw inbound webhook as the host's
//! endpoint decoded it; [`PaymentEvent`] is the verified, typed outcome
//! the callback verifier emits.
//!
//! # Wire fields
//!
//! The gateway posts callbacks as form data. Signed fields and their
//! order are pinned by [`CALLBACK_SIGNED_FIELDS`]:
//!
//! | field               | meaning              | signed |
//! |---------------------|----------------------|--------|
//! | `MERCHANT_ID`       | merchant id          | yes    |
//! | `AMOUNT`            | paid amount          | yes    |
//! | `MERCHANT_ORDER_ID` | order id             | yes    |
//! | `intid`             | gateway operation id | no     |
//! | `SIGN`              | claimed signature    | -      |

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::VerificationError;

/// Callback wire field carrying the merchant id
pub const FIELD_MERCHANT_ID: &str = "MERCHANT_ID";
/// Callback wire field carrying the paid amount
pub const FIELD_AMOUNT: &str = "AMOUNT";
/// Callback wire field carrying the merchant's order id
pub const FIELD_ORDER_ID: &str = "MERCHANT_ORDER_ID";
/// Callback wire field carrying the claimed signature
pub const FIELD_SIGN: &str = "SIGN";

/// Callback wire field names covered by the signature, in signing order
pub const CALLBACK_SIGNED_FIELDS: [&str; 3] = [FIELD_MERCHANT_ID, FIELD_AMOUNT, FIELD_ORDER_ID];

/// One raw gateway notification, as decoded by the host's webhook endpoint
///
/// Transient: received once, verified once, never persisted by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackNotification {
    /// Decoded form/query fields, claimed signature excluded
    pub raw_fields: HashMap<String, String>,
    /// The signature the sender claims over the fields
    pub claimed_signature: String,
}

impl CallbackNotification {
    /// Build a notification from already-decoded form fields
    ///
    /// Pulls `SIGN` out of the field map; a missing `SIGN` yields an empty
    /// claimed signature, which can never verify.
    pub fn from_form(mut fields: HashMap<String, String>) -> Self {
        let claimed_signature = fields.remove(FIELD_SIGN).unwrap_or_default();
        Self {
            raw_fields: fields,
            claimed_signature,
        }
    }

    /// Fetch a required field
    pub(crate) fn required(&self, field: &'static str) -> Result<&str, VerificationError> {
        self.raw_fields
            .get(field)
            .map(String::as_str)
            .ok_or(VerificationError::MalformedField {
                field,
                reason: "missing".to_string(),
            })
    }

    /// Parse the claimed amount
    pub(crate) fn amount(&self) -> Result<Decimal, VerificationError> {
        let raw = self.required(FIELD_AMOUNT)?;
        let mut amount: Decimal =
            raw.parse().map_err(|_| VerificationError::MalformedField {
                field: FIELD_AMOUNT,
                reason: format!("not a decimal amount: {raw:?}"),
            })?;
        amount.rescale(2);
        Ok(amount)
    }
}

/// Final status of a payment, as reported by a verified callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// The gateway collected the funds
    Success,
    /// The payment attempt failed
    Failed,
}

impl PaymentStatus {
    /// Whether the payment went through
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// A verified payment outcome emitted by the callback verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEvent {
    /// The merchant's order id
    pub order_id: String,
    /// The paid amount, normalized to two fractional digits
    pub amount: Decimal,
    /// Payment outcome
    pub status: PaymentStatus,
    /// Always true for events emitted by the verifier; retained so hosts
    /// persisting events elsewhere keep the provenance bit
    pub verified: bool,
    /// When the verifier first processed this order
    pub processed_at: DateTime<Utc>,
}
