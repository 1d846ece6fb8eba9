//! Webhook endpoint for gateway callbacks
//!
//! A ready-made axum layer a host can mount. The gateway retries a
//! notification until it receives the literal body `YES`; everything
//! else is treated as failure on its side. The mapping here is strict:
//!
//! ```text
//! verified (new or duplicate)          -> 200 "YES"
//! bad signature / malformed / mismatch -> 400 "NO"
//! unknown order                        -> 404 "NO"
//! store failure                        -> 500 "NO"
//! ```
//!
//! A failed verification must never be acknowledged with `YES`: the
//! gateway would mark the order paid.
//!
//! # Endpoints
//!
//! - `POST /callback` - form-encoded gateway notification
//! - `GET /health` - liveness check for load balancers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use metrics::counter;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::VerificationError;
use crate::gateway::{CallbackNotification, GatewayClient, OrderStore};

/// Shared state for the webhook endpoint
pub struct WebhookState<S: OrderStore> {
    /// The gateway client handling verification
    pub client: GatewayClient<S>,
}

impl<S: OrderStore> WebhookState<S> {
    /// Wrap a client for use as axum state
    pub fn new(client: GatewayClient<S>) -> Self {
        Self { client }
    }
}

/// Build the webhook router
pub fn webhook_router<S: OrderStore>(state: Arc<WebhookState<S>>) -> Router {
    Router::new()
        .route("/callback", post(callback_handler::<S>))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle one gateway callback
async fn callback_handler<S: OrderStore>(
    State(state): State<Arc<WebhookState<S>>>,
    Form(fields): Form<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    let notification = CallbackNotification::from_form(fields);

    match state.client.handle_callback(&notification).await {
        Ok(event) => {
            counter!("kassa_callbacks_accepted_total").increment(1);
            info!(
                order_id = %event.order_id,
                amount = %event.amount,
                status = ?event.status,
                "Callback acknowledged"
            );
            (StatusCode::OK, "YES")
        }
        Err(err) => {
            counter!("kassa_callbacks_rejected_total").increment(1);
            let status = match &err {
                VerificationError::BadSignature
                | VerificationError::AmountMismatch { .. }
                | VerificationError::MalformedField { .. } => StatusCode::BAD_REQUEST,
                VerificationError::UnknownOrder(_) => StatusCode::NOT_FOUND,
                VerificationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            warn!(error = %err, status = %status, "Callback rejected");
            (status, "NO")
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Liveness check
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}
