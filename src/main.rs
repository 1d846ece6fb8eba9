//! Kassa Gateway webhook daemon
//!
//! Serves the gateway callback endpoint over HTTP, backed by the
//! in-memory order store. Credentials come from the environment.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use kassa_gateway::gateway::{GatewayClient, InMemoryOrderStore};
use kassa_gateway::webhook::{webhook_router, WebhookState};
use kassa_gateway::GatewayConfig;

/// Kassa Gateway webhook daemon
#[derive(Parser, Debug)]
#[command(name = "kassa-gatewayd")]
#[command(version)]
#[command(about = "Payment gateway callback verification endpoint")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3002")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Order ids to seed as pending (repeatable)
    #[arg(long = "order")]
    orders: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = GatewayConfig::from_env().context("loading gateway configuration")?;
    tracing::info!(
        merchant_id = config.credentials.merchant_id(),
        endpoint = %config.credentials.api_endpoint(),
        "Kassa Gateway webhook daemon starting on {}:{}",
        args.host,
        args.port
    );

    let store = Arc::new(InMemoryOrderStore::new());
    for order_id in &args.orders {
        store.register(order_id.clone()).await;
        tracing::debug!(order_id = %order_id, "Seeded pending order");
    }

    let client = GatewayClient::new(config.credentials, store);
    let app = webhook_router(Arc::new(WebhookState::new(client)));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await.context("serving webhook")?;

    Ok(())
}
