//! Signature engine
//!
//! Computes and verifies the gateway's message-authentication signatures.
//!
//! # Scheme
//!
//! The scheme is pinned here and nowhere else: field *values* are joined
//! with `:` in the order the caller supplies them, the shared secret is
//! appended as the final `:`-separated segment, the result is hashed with
//! MD5 and emitted as lowercase hex. Signature schemes are order-sensitive,
//! so callers pass an ordered slice, never a hash map.
//!
//! ```text
//! signature = hex( md5( v1 ":" v2 ":" ... ":" vN ":" key ) )
//! ```
//!
//! # Security
//!
//! - Verification uses constant-time comparison (`subtle::ConstantTimeEq`)
//!   to prevent timing attacks
//! - `verify` treats malformed input as a failed verification and returns
//!   `false`; it never panics and never errors

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;

/// Compute the signature over field values in the given order
///
/// Total function: any well-formed input yields a signature. Deterministic:
/// identical inputs always yield the identical signature.
pub fn sign<S: AsRef<str>>(values: &[S], key: &str) -> String {
    let mut hasher = Md5::new();
    for value in values {
        hasher.update(value.as_ref().as_bytes());
        hasher.update(b":");
    }
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a claimed signature against the recomputed one
///
/// Comparison is constant-time on the digest bytes. The claimed hex is
/// accepted case-insensitively; anything that is not valid hex of digest
/// length fails verification. Verification failure is a normal outcome,
/// not an error.
pub fn verify<S: AsRef<str>>(values: &[S], claimed: &str, key: &str) -> bool {
    let expected = sign(values, key);

    let claimed = claimed.to_ascii_lowercase();
    let Ok(claimed_bytes) = hex::decode(&claimed) else {
        return false;
    };
    let Ok(expected_bytes) = hex::decode(&expected) else {
        return false;
    };
    if claimed_bytes.len() != expected_bytes.len() {
        return false;
    }

    expected_bytes.ct_eq(&claimed_bytes).into()
}
