//! Kassa Gateway - Payment Gateway Client & Webhook Verification Core
//!
//! This crate provides the merchant-side core for a FreeKassa-style payment
//! gateway: building signed payment-initiation payloads and verifying the
//! gateway's asynchronous callbacks with idempotent delivery semantics.
//!
//! # Features
//!
//! - **Signed payloads**: deterministic, order-pinned MD5 signatures
//! - **Callback verification**: constant-time signature checks, typed events
//! - **Idempotency**: duplicate deliveries replay the stored event exactly once
//! - **Webhook layer**: optional axum router answering the gateway's `YES`/`NO` protocol
//!
//! # Architecture
//!
//! ```text
//! Host App ──▶ GatewayClient ──▶ Request Builder ──▶ redirect URL / payload
//!                  │                                        │
//!                  ▼                                        ▼
//!          Callback Verifier                         host's transport
//!                  │
//!         ┌────────┴────────┐
//!         ▼                 ▼
//!   Signature Engine    OrderStore (CAS)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kassa_gateway::gateway::{
//!     Credentials, Currency, GatewayClient, InMemoryOrderStore, PaymentRequest,
//! };
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::new("M1", "key-one", "key-two", "https://pay.freekassa.ru/")?;
//!     let store = Arc::new(InMemoryOrderStore::new());
//!     let client = GatewayClient::new(creds, store.clone());
//!
//!     store.register("ORD-1").await;
//!     let request = PaymentRequest::new("ORD-1", Decimal::new(1000, 2), Currency::Usd);
//!     let url = client.payment_url(&request)?;
//!
//!     println!("Redirect the payer to: {url}");
//!     Ok(())
//! }
//! ```
//!
//! Transport is deliberately out of scope: the host sends the redirect and
//! receives the webhook; this crate only constructs and verifies.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod webhook;

// Re-exports for convenience
pub use config::GatewayConfig;
pub use error::{
    ConfigError, Error, Result, StoreError, ValidationError, VerificationError,
};
pub use gateway::{
    CallbackNotification, CallbackVerifier, Credentials, Currency, GatewayClient,
    InMemoryOrderStore, OrderStatus, OrderStore, PaymentEvent, PaymentRequest, PaymentStatus,
    SignedPayload,
};
pub use webhook::{webhook_router, WebhookState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
