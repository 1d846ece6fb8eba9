//! Gateway client façade
//!
//! The only component hosts touch. Built once at startup from
//! configuration and passed explicitly to whatever needs it; no global
//! lookup, no internal mutability beyond the shared order store, safe to
//! share across concurrent calls.

use std::sync::Arc;

use url::Url;

use crate::error::{ValidationError, VerificationError};
use crate::gateway::callback::CallbackVerifier;
use crate::gateway::credentials::Credentials;
use crate::gateway::events::{CallbackNotification, PaymentEvent};
use crate::gateway::request::{self, PaymentRequest, SignedPayload};
use crate::gateway::store::OrderStore;

/// Payment gateway client
///
/// Composes the credential store, request builder and callback verifier.
/// Cheap to clone; clones share the order store.
pub struct GatewayClient<S: OrderStore> {
    creds: Credentials,
    verifier: Arc<CallbackVerifier<S>>,
}

impl<S: OrderStore> Clone for GatewayClient<S> {
    fn clone(&self) -> Self {
        Self {
            creds: self.creds.clone(),
            verifier: self.verifier.clone(),
        }
    }
}

impl<S: OrderStore> GatewayClient<S> {
    /// Build a client from credentials and the host's order store
    pub fn new(creds: Credentials, store: Arc<S>) -> Self {
        let verifier = Arc::new(CallbackVerifier::new(creds.clone(), store));
        Self { creds, verifier }
    }

    /// The credentials this client operates with
    pub fn credentials(&self) -> &Credentials {
        &self.creds
    }

    /// The order store backing callback idempotency
    pub fn store(&self) -> &Arc<S> {
        self.verifier.store()
    }

    /// Build a signed payment-initiation payload
    ///
    /// The payload is handed to the host's transport; this call performs
    /// no I/O.
    pub fn initiate_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<SignedPayload, ValidationError> {
        request::build(&self.creds, request)
    }

    /// Build the checkout redirect URL for a payment request
    pub fn payment_url(&self, request: &PaymentRequest) -> Result<Url, ValidationError> {
        let payload = self.initiate_payment(request)?;
        Ok(request::redirect_url(&self.creds, &payload))
    }

    /// Verify one inbound notification and emit the payment event
    pub async fn handle_callback(
        &self,
        notification: &CallbackNotification,
    ) -> Result<PaymentEvent, VerificationError> {
        self.verifier.handle(notification).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::request::Currency;
    use crate::gateway::store::InMemoryOrderStore;
    use rust_decimal::Decimal;

    fn client() -> GatewayClient<InMemoryOrderStore> {
        let creds = Credentials::new("M1", "abc", "xyz", "https://pay.example.com/").unwrap();
        GatewayClient::new(creds, Arc::new(InMemoryOrderStore::new()))
    }

    #[test]
    fn test_initiate_payment_builds_payload() {
        let client = client();
        let request = PaymentRequest::new("ORD-1", Decimal::new(1000, 2), Currency::Usd);
        let payload = client.initiate_payment(&request).unwrap();
        assert_eq!(payload.field("m"), Some("M1"));
        assert_eq!(payload.field("oa"), Some("10.00"));
        assert_eq!(payload.field("o"), Some("ORD-1"));
        assert!(!payload.signature.is_empty());
    }

    #[test]
    fn test_payment_url_points_at_endpoint() {
        let client = client();
        let request = PaymentRequest::new("ORD-1", Decimal::new(1000, 2), Currency::Usd);
        let url = client.payment_url(&request).unwrap();
        assert_eq!(url.host_str(), Some("pay.example.com"));
        assert!(url.query().unwrap().contains("o=ORD-1"));
    }

    #[test]
    fn test_clones_share_the_store() {
        let client = client();
        let clone = client.clone();
        assert!(Arc::ptr_eq(client.store(), clone.store()));
    }
}
