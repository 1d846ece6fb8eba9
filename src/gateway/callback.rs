//! Callback verifier
//!
//! Validates an inbound gateway notification and turns it into a typed
//! [`PaymentEvent`]. One pass per notification, terminal at every exit:
//!
//! ```text
//! RECEIVED -> (verify signature) -> SIGNATURE_INVALID   (reject)
//!                                -> SIGNATURE_VALID
//!                                     -> (idempotency)  -> DUPLICATE  (replay event, no side effects)
//!                                                       -> NEW        -> PROCESSED (emit event)
//! ```
//!
//! The signature check always runs first: an unverified notification must
//! never touch the order store. A duplicate with a different amount is a
//! hard [`VerificationError::AmountMismatch`], never silently accepted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::VerificationError;
use crate::gateway::credentials::Credentials;
use crate::gateway::events::{
    CallbackNotification, PaymentEvent, PaymentStatus, CALLBACK_SIGNED_FIELDS, FIELD_ORDER_ID,
};
use crate::gateway::signature;
use crate::gateway::store::{OrderStatus, OrderStore};

/// Verifies inbound notifications against the signature engine and the
/// host's order store
pub struct CallbackVerifier<S: OrderStore> {
    creds: Credentials,
    store: Arc<S>,
}

impl<S: OrderStore> CallbackVerifier<S> {
    /// Create a verifier over the given credentials and order store
    pub fn new(creds: Credentials, store: Arc<S>) -> Self {
        Self { creds, store }
    }

    /// The order store this verifier consults
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Handle one notification to a terminal outcome
    ///
    /// # Errors
    ///
    /// - [`VerificationError::BadSignature`] - signature check failed; the
    ///   caller must answer the gateway with a rejection, never a success
    ///   acknowledgment
    /// - [`VerificationError::MalformedField`] - a required field is missing
    ///   or unparseable
    /// - [`VerificationError::UnknownOrder`] - the order store has never
    ///   seen this order id
    /// - [`VerificationError::AmountMismatch`] - duplicate delivery with a
    ///   different amount than the processed one
    pub async fn handle(
        &self,
        notification: &CallbackNotification,
    ) -> Result<PaymentEvent, VerificationError> {
        // Signed fields must all be present before anything else.
        let mut signed_values = Vec::with_capacity(CALLBACK_SIGNED_FIELDS.len());
        for field in CALLBACK_SIGNED_FIELDS {
            signed_values.push(notification.required(field)?);
        }

        if !signature::verify(
            &signed_values,
            &notification.claimed_signature,
            self.creds.secret_key2(),
        ) {
            warn!(
                order_id = notification.raw_fields.get(FIELD_ORDER_ID).map(String::as_str),
                "Callback rejected: bad signature"
            );
            return Err(VerificationError::BadSignature);
        }

        let order_id = notification.required(FIELD_ORDER_ID)?.to_string();
        let amount = notification.amount()?;

        match self.store.get_order(&order_id).await? {
            None => {
                warn!(order_id = %order_id, "Callback rejected: unknown order");
                Err(VerificationError::UnknownOrder(order_id))
            }
            Some(OrderStatus::Processed {
                amount: processed_amount,
                event,
            }) => {
                if processed_amount != amount {
                    warn!(
                        order_id = %order_id,
                        processed = %processed_amount,
                        claimed = %amount,
                        "Callback rejected: duplicate with different amount"
                    );
                    return Err(VerificationError::AmountMismatch {
                        order_id,
                        processed: processed_amount.to_string(),
                        claimed: amount.to_string(),
                    });
                }
                debug!(order_id = %order_id, "Duplicate callback, replaying stored event");
                Ok(event)
            }
            Some(OrderStatus::Pending) => {
                let event = PaymentEvent {
                    order_id: order_id.clone(),
                    amount,
                    status: PaymentStatus::Success,
                    verified: true,
                    processed_at: Utc::now(),
                };

                // CAS: a concurrent duplicate may have won between our read
                // and this write; its event is the canonical one then.
                if self
                    .store
                    .mark_processed(&order_id, amount, event.clone())
                    .await?
                {
                    debug!(order_id = %order_id, amount = %amount, "Callback processed");
                    return Ok(event);
                }

                match self.store.get_order(&order_id).await? {
                    Some(OrderStatus::Processed {
                        amount: processed_amount,
                        event,
                    }) if processed_amount == amount => Ok(event),
                    Some(OrderStatus::Processed {
                        amount: processed_amount,
                        ..
                    }) => Err(VerificationError::AmountMismatch {
                        order_id,
                        processed: processed_amount.to_string(),
                        claimed: amount.to_string(),
                    }),
                    _ => Err(VerificationError::Store(crate::error::StoreError::Backend(
                        format!("lost mark_processed race for {order_id} but order not processed"),
                    ))),
                }
            }
        }
    }
}
