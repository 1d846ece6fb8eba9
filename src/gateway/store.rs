//! Order store
//!
//! The idempotency/order store is an external shared resource; the trait
//! here is the contract the callback verifier relies on. The one hard
//! requirement is check-and-set atomicity per order id: of two concurrent
//! duplicate callbacks, exactly one `mark_processed` call may win.
//!
//! [`InMemoryOrderStore`] is the bundled single-process implementation;
//! hosts with durable storage implement [`OrderStore`] over their own
//! transaction discipline.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::gateway::events::PaymentEvent;

/// Status of an order as the store sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    /// Order exists, no verified callback processed yet
    Pending,
    /// A verified callback was processed for this order
    Processed {
        /// Amount recorded at processing time
        amount: Decimal,
        /// The event emitted at processing time, replayed on duplicates
        event: PaymentEvent,
    },
}

/// External order/idempotency store contract
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync + 'static {
    /// Look up the current status of an order
    ///
    /// `None` means the order id is unknown to the host.
    async fn get_order(&self, order_id: &str) -> Result<Option<OrderStatus>, StoreError>;

    /// Atomically mark a pending order processed
    ///
    /// Returns `true` only for the first caller; any later caller (or a
    /// concurrent loser) gets `false` and must treat the delivery as a
    /// duplicate. Implementations must make the read-check-write a single
    /// atomic step per order id.
    async fn mark_processed(
        &self,
        order_id: &str,
        amount: Decimal,
        event: PaymentEvent,
    ) -> Result<bool, StoreError>;
}

/// Single-process order store backed by an in-memory map
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, OrderStatus>>>,
}

impl InMemoryOrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pending order
    ///
    /// Callbacks for ids never registered here are rejected as unknown.
    pub async fn register(&self, order_id: impl Into<String>) {
        self.orders
            .write()
            .await
            .entry(order_id.into())
            .or_insert(OrderStatus::Pending);
    }

    /// Number of orders currently tracked
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Whether the store tracks no orders
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get_order(&self, order_id: &str) -> Result<Option<OrderStatus>, StoreError> {
        Ok(self.orders.read().await.get(order_id).cloned())
    }

    async fn mark_processed(
        &self,
        order_id: &str,
        amount: Decimal,
        event: PaymentEvent,
    ) -> Result<bool, StoreError> {
        // Single write lock covers the read-check-write, which is the CAS
        // guarantee the verifier depends on.
        let mut orders = self.orders.write().await;
        match orders.get(order_id) {
            Some(OrderStatus::Pending) => {
                orders.insert(order_id.to_string(), OrderStatus::Processed { amount, event });
                Ok(true)
            }
            Some(OrderStatus::Processed { .. }) => Ok(false),
            None => Err(StoreError::Backend(format!(
                "mark_processed for unregistered order {order_id}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::events::PaymentStatus;
    use chrono::Utc;

    fn event(order_id: &str, amount: Decimal) -> PaymentEvent {
        PaymentEvent {
            order_id: order_id.to_string(),
            amount,
            status: PaymentStatus::Success,
            verified: true,
            processed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_order_is_none() {
        let store = InMemoryOrderStore::new();
        assert_eq!(store.get_order("ORD-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_then_mark_processed() {
        let store = InMemoryOrderStore::new();
        store.register("ORD-1").await;
        assert_eq!(
            store.get_order("ORD-1").await.unwrap(),
            Some(OrderStatus::Pending)
        );

        let amount = Decimal::new(1000, 2);
        assert!(store
            .mark_processed("ORD-1", amount, event("ORD-1", amount))
            .await
            .unwrap());
        assert!(matches!(
            store.get_order("ORD-1").await.unwrap(),
            Some(OrderStatus::Processed { .. })
        ));
    }

    #[tokio::test]
    async fn test_second_mark_loses() {
        let store = InMemoryOrderStore::new();
        store.register("ORD-1").await;
        let amount = Decimal::new(1000, 2);
        assert!(store
            .mark_processed("ORD-1", amount, event("ORD-1", amount))
            .await
            .unwrap());
        assert!(!store
            .mark_processed("ORD-1", amount, event("ORD-1", amount))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_marks_have_one_winner() {
        let store = Arc::new(InMemoryOrderStore::new());
        store.register("ORD-1").await;
        let amount = Decimal::new(1000, 2);

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .mark_processed("ORD-1", amount, event("ORD-1", amount))
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
