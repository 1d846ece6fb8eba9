//! Property-based testing for the signature engine and request builder.
//!
//! Uses proptest to generate arbitrary field sets, keys and requests and
//! verify the signing invariants: round-trip acceptance, mutation
//! rejection, and build determinism.

use proptest::prelude::*;
use rust_decimal::Decimal;

use kassa_gateway::gateway::{request, signature};
use kassa_gateway::{Credentials, Currency, PaymentRequest};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Strategy for field values as they appear on the wire
fn arb_field_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ._-]{0,24}"
}

/// Strategy for ordered field lists
fn arb_fields() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_field_value(), 1..6)
}

/// Strategy for secret keys
fn arb_key() -> impl Strategy<Value = String> {
    "[!-~]{1,32}"
}

/// Strategy for valid order ids
fn arb_order_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._-]{1,64}"
}

/// Strategy for non-negative two-decimal amounts
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_currency() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::Rub),
        Just(Currency::Usd),
        Just(Currency::Eur),
    ]
}

fn arb_payment_request() -> impl Strategy<Value = PaymentRequest> {
    (
        arb_order_id(),
        arb_amount(),
        arb_currency(),
        prop::option::of("[a-z ]{0,32}"),
    )
        .prop_map(|(order_id, amount, currency, description)| PaymentRequest {
            order_id,
            amount,
            currency,
            description,
        })
}

fn test_creds() -> Credentials {
    Credentials::new("M1", "abc", "xyz", "https://pay.example.com/").unwrap()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    /// sign then verify always succeeds
    #[test]
    fn prop_sign_verify_round_trip(fields in arb_fields(), key in arb_key()) {
        let sig = signature::sign(&fields, &key);
        prop_assert!(signature::verify(&fields, &sig, &key));
    }

    /// signing is a pure function
    #[test]
    fn prop_sign_is_deterministic(fields in arb_fields(), key in arb_key()) {
        prop_assert_eq!(signature::sign(&fields, &key), signature::sign(&fields, &key));
    }

    /// any single-nibble mutation of the signature is rejected
    #[test]
    fn prop_mutated_signature_rejected(
        fields in arb_fields(),
        key in arb_key(),
        position in 0usize..32,
    ) {
        let sig = signature::sign(&fields, &key);
        let mut chars: Vec<char> = sig.chars().collect();
        let index = position % chars.len();
        // Move the nibble to the next hex digit, wrapping f -> 0.
        let old = chars[index].to_digit(16).unwrap();
        chars[index] = char::from_digit((old + 1) % 16, 16).unwrap();
        let mutated: String = chars.into_iter().collect();

        prop_assert!(!signature::verify(&fields, &mutated, &key));
    }

    /// a wrong key never verifies
    #[test]
    fn prop_wrong_key_rejected(fields in arb_fields(), key in arb_key(), other in arb_key()) {
        prop_assume!(key != other);
        let sig = signature::sign(&fields, &key);
        prop_assert!(!signature::verify(&fields, &sig, &other));
    }

    /// build is byte-deterministic over arbitrary valid requests
    #[test]
    fn prop_build_is_deterministic(req in arb_payment_request()) {
        let creds = test_creds();
        let a = request::build(&creds, &req).unwrap();
        let b = request::build(&creds, &req).unwrap();
        prop_assert_eq!(a, b);
    }

    /// every built payload verifies under the outbound key
    #[test]
    fn prop_built_payload_verifies(req in arb_payment_request()) {
        let creds = test_creds();
        let payload = request::build(&creds, &req).unwrap();
        let values = [
            payload.field("m").unwrap(),
            payload.field("oa").unwrap(),
            payload.field("o").unwrap(),
        ];
        prop_assert!(signature::verify(&values, &payload.signature, creds.secret_key1()));
    }
}
