//! Outbound payment requests
//!
//! [`PaymentRequest`] is the caller-facing value object; the request
//! builder validates it and produces a deterministic [`SignedPayload`]
//! ready to be handed to the host's transport, either as raw fields or
//! as a checkout redirect URL.
//!
//! # Wire fields
//!
//! The gateway's checkout form takes short field names. Signed fields and
//! their order are pinned by [`OUTBOUND_SIGNED_FIELDS`]:
//!
//! | field      | meaning            | signed |
//! |------------|--------------------|--------|
//! | `m`        | merchant id        | yes    |
//! | `oa`       | amount             | yes    |
//! | `o`        | order id           | yes    |
//! | `currency` | currency code      | no     |
//! | `desc`     | description        | no     |

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;
use crate::gateway::credentials::Credentials;
use crate::gateway::signature;

/// Wire field names covered by the outbound signature, in signing order
pub const OUTBOUND_SIGNED_FIELDS: [&str; 3] = ["m", "oa", "o"];

/// Order ids: 1..=64 chars of letters, digits, dot, underscore, hyphen
fn order_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]{1,64}$").expect("static pattern"))
}

/// Supported settlement currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Russian ruble
    Rub,
    /// US dollar
    Usd,
    /// Euro
    Eur,
}

impl Currency {
    /// ISO 4217 code as the gateway expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rub => "RUB",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound payment attempt
///
/// Immutable once built; consumed by [`build`] to produce a signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Order id, unique per merchant
    pub order_id: String,
    /// Payment amount; normalized to two fractional digits at build time
    pub amount: Decimal,
    /// Settlement currency
    pub currency: Currency,
    /// Optional human-readable description shown on the checkout page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PaymentRequest {
    /// Convenience constructor
    pub fn new(order_id: impl Into<String>, amount: Decimal, currency: Currency) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            currency,
            description: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A fully built, signed outbound payload
///
/// `fields` preserves wire order; the signature is a pure function of the
/// fields and the signing key, so rebuilding from identical inputs yields
/// a byte-identical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPayload {
    /// Ordered wire fields
    pub fields: Vec<(String, String)>,
    /// Lowercase hex signature over the signed fields
    pub signature: String,
}

impl SignedPayload {
    /// Look up a field by wire name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Render an amount with exactly two fractional digits
///
/// The gateway signs the textual amount, so the rendering must be stable:
/// `10`, `10.0` and `10.00` all sign as `10.00`.
pub(crate) fn format_amount(amount: Decimal) -> String {
    let mut normalized = amount;
    normalized.rescale(2);
    normalized.to_string()
}

/// Validate a request against the gateway's constraints
pub(crate) fn validate(request: &PaymentRequest) -> Result<(), ValidationError> {
    if request.amount.is_sign_negative() {
        return Err(ValidationError::NegativeAmount(request.amount.to_string()));
    }
    if !order_id_pattern().is_match(&request.order_id) {
        return Err(ValidationError::InvalidOrderId(request.order_id.clone()));
    }
    Ok(())
}

/// Build a signed payload for an outbound payment
///
/// Deterministic: identical credentials and request always produce an
/// identical payload. Performs no I/O; handing the payload to the gateway
/// is the host's job.
///
/// # Errors
///
/// [`ValidationError`] if the amount is negative or the order id falls
/// outside the allowed character set.
pub fn build(creds: &Credentials, request: &PaymentRequest) -> Result<SignedPayload, ValidationError> {
    validate(request)?;

    let amount = format_amount(request.amount);

    let mut fields = vec![
        ("m".to_string(), creds.merchant_id().to_string()),
        ("oa".to_string(), amount.clone()),
        ("o".to_string(), request.order_id.clone()),
        ("currency".to_string(), request.currency.as_str().to_string()),
    ];
    if let Some(desc) = &request.description {
        fields.push(("desc".to_string(), desc.clone()));
    }

    let signed_values = [creds.merchant_id(), amount.as_str(), request.order_id.as_str()];
    let signature = signature::sign(&signed_values, creds.secret_key1());

    Ok(SignedPayload { fields, signature })
}

/// Assemble the checkout redirect URL for a built payload
///
/// Appends every payload field plus `s` (the signature) as query pairs on
/// the configured endpoint.
pub fn redirect_url(creds: &Credentials, payload: &SignedPayload) -> Url {
    let mut url = creds.api_endpoint().clone();
    {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &payload.fields {
            pairs.append_pair(name, value);
        }
        pairs.append_pair("s", &payload.signature);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn test_creds() -> Credentials {
        Credentials::new("M1", "abc", "xyz", "https://pay.example.com/merchant/").unwrap()
    }

    fn test_request() -> PaymentRequest {
        PaymentRequest::new("ORD-1", Decimal::new(1000, 2), Currency::Usd)
    }

    #[test]
    fn test_build_is_deterministic() {
        let creds = test_creds();
        let request = test_request();
        assert_eq!(
            build(&creds, &request).unwrap(),
            build(&creds, &request).unwrap()
        );
    }

    #[test]
    fn test_build_signature_round_trips() {
        let creds = test_creds();
        let payload = build(&creds, &test_request()).unwrap();
        let values = [
            payload.field("m").unwrap(),
            payload.field("oa").unwrap(),
            payload.field("o").unwrap(),
        ];
        assert!(signature::verify(&values, &payload.signature, "abc"));
    }

    #[test]
    fn test_amount_rendering_is_stable() {
        assert_eq!(format_amount(Decimal::new(10, 0)), "10.00");
        assert_eq!(format_amount(Decimal::new(100, 1)), "10.00");
        assert_eq!(format_amount(Decimal::new(1000, 2)), "10.00");
        assert_eq!(format_amount(Decimal::new(1001, 2)), "10.01");
    }

    #[test]
    fn test_equivalent_amounts_sign_identically() {
        let creds = test_creds();
        let a = build(
            &creds,
            &PaymentRequest::new("ORD-1", Decimal::new(10, 0), Currency::Usd),
        )
        .unwrap();
        let b = build(
            &creds,
            &PaymentRequest::new("ORD-1", Decimal::new(1000, 2), Currency::Usd),
        )
        .unwrap();
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let creds = test_creds();
        let request = PaymentRequest::new("ORD-1", Decimal::new(-1, 2), Currency::Usd);
        assert!(matches!(
            build(&creds, &request),
            Err(ValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_bad_order_id_rejected() {
        let creds = test_creds();
        for bad in ["", "has space", "бнопня", &"x".repeat(65)] {
            let request = PaymentRequest::new(bad, Decimal::new(1000, 2), Currency::Usd);
            assert!(
                matches!(build(&creds, &request), Err(ValidationError::InvalidOrderId(_))),
                "order id {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_description_carried_but_not_signed() {
        let creds = test_creds();
        let plain = build(&creds, &test_request()).unwrap();
        let described = build(&creds, &test_request().with_description("coffee")).unwrap();
        assert_eq!(plain.signature, described.signature);
        assert_eq!(described.field("desc"), Some("coffee"));
        assert_eq!(plain.field("desc"), None);
    }

    #[test]
    fn test_redirect_url_carries_all_fields() {
        let creds = test_creds();
        let payload = build(&creds, &test_request()).unwrap();
        let url = redirect_url(&creds, &payload);
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("m".to_string(), "M1".to_string())));
        assert!(query.contains(&("oa".to_string(), "10.00".to_string())));
        assert!(query.contains(&("o".to_string(), "ORD-1".to_string())));
        assert!(query.contains(&("currency".to_string(), "USD".to_string())));
        assert!(query.contains(&("s".to_string(), payload.signature.clone())));
    }
}
