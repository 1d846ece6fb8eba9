//! Payment gateway core
//!
//! The client and webhook-verification core for a FreeKassa-style payment
//! gateway:
//!
//! - **Credentials**: merchant id, split secret keys, endpoint; validated
//!   once, immutable after
//! - **Signature Engine**: ordered-field MD5 signing with constant-time
//!   verification
//! - **Request Builder**: deterministic signed payloads and checkout
//!   redirect URLs
//! - **Callback Verifier**: signature check, idempotent delivery, typed
//!   payment events
//! - **Gateway Client**: the façade composing all of the above
//!
//! # Architecture
//!
//! ```text
//! Host ──▶ GatewayClient ──▶ Request Builder ──▶ SignedPayload / redirect URL
//!               │
//!               └──────────▶ Callback Verifier ──▶ PaymentEvent
//!                                   │
//!                    Signature Engine + OrderStore (CAS idempotency)
//! ```
//!
//! Transport is the host's job: this module performs no network I/O.

pub mod callback;
pub mod client;
pub mod credentials;
pub mod events;
pub mod request;
pub mod signature;
pub mod store;

pub use callback::CallbackVerifier;
pub use client::GatewayClient;
pub use credentials::Credentials;
pub use events::{CallbackNotification, PaymentEvent, PaymentStatus};
pub use request::{Currency, PaymentRequest, SignedPayload};
pub use store::{InMemoryOrderStore, OrderStatus, OrderStore};
