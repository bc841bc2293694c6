// qrdine-client/examples/order_flow.rs
// Walk the ordering flow against a running backend: scan-in, browse,
// place an order, track it until payment.

use qrdine_client::{
    ClientConfig, EventBridge, MemoryStore, TableSessionStore, UnpaidOrderCache,
};
use shared::models::order::{CreateOrderItem, CreateOrderRequest};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <session_id> <table_number>", args[0]);
        println!("  Example: {} qr-sess-af31 7", args[0]);
        return Ok(());
    }

    let session_id = &args[1];
    let table_number: i32 = args[2].parse()?;

    let base_url = std::env::var("QRDINE_API_URL")
        .unwrap_or_else(|_| "http://localhost:8080/api".to_string());

    let transient = Arc::new(MemoryStore::new());
    let sessions = TableSessionStore::new(transient.clone());
    let unpaid = UnpaidOrderCache::new(transient);

    let session = sessions.create(session_id.clone(), table_number);
    tracing::info!(
        table = session.table_number,
        remaining_secs = sessions.remaining_time().as_secs(),
        "Table session established"
    );

    let gateway = ClientConfig::new(&base_url).build_http_client();

    // Browse the menu and order the first two dishes
    let products = gateway.get_all_products().await?;
    tracing::info!(count = products.len(), "Catalog loaded");
    let picks: Vec<_> = products.iter().take(2).collect();
    if picks.is_empty() {
        anyhow::bail!("catalog is empty, nothing to order");
    }

    let total: i64 = picks.iter().map(|p| p.price).sum();
    let request = CreateOrderRequest {
        session_id: session.session_id.clone(),
        table_number: session.table_number,
        name: Some("Walk-in customer".to_string()),
        user_id: None,
        promotion_code: None,
        total,
        items: picks
            .iter()
            .map(|p| CreateOrderItem {
                product_id: p.product_id,
                quantity: 1,
                note: None,
            })
            .collect(),
    };

    let order = gateway.create_order(&request).await?;
    unpaid.add(&session.session_id, order.order_id);
    tracing::info!(order_id = order.order_id, total = order.total_amount, "Order placed");

    // Track the order until the backend reports payment
    let bridge = EventBridge::new(&gateway, unpaid.clone());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    bridge.track_unpaid(
        &session.session_id,
        order.order_id,
        move |payload| {
            let _ = tx.send(payload);
        },
        |err| tracing::warn!(error = %err, "Payment stream problem"),
    );

    tracing::info!("Waiting for payment confirmation (Ctrl-C to stop)...");
    tokio::select! {
        Some(payload) = rx.recv() => {
            tracing::info!(
                amount = payload.amount,
                gateway = payload.gateway.as_deref().unwrap_or("-"),
                "Payment confirmed"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }

    bridge.shutdown().await;
    tracing::info!(
        still_unpaid = ?unpaid.list(&session.session_id),
        "Done"
    );
    Ok(())
}
