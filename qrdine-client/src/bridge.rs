//! Event bridge
//!
//! Translates the backend's per-order push streams into typed callbacks
//! and unpaid-cache maintenance. Each watched order gets its own
//! subscription; the registry guarantees that teardown closes every open
//! transport, not just the most recent one.

use crate::error::ClientError;
use crate::http::HttpClient;
use crate::sse::{spawn_event_stream, SseEvent, StreamConfig, SubscriptionHandle};
use crate::unpaid::UnpaidOrderCache;
use shared::events::{
    PaymentStatusPayload, EVENT_CONNECTED, EVENT_HEARTBEAT, EVENT_ORDER_STATUS_CHANGED,
    EVENT_PAYMENT_STATUS,
};
use shared::OrderDetail;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StreamKind {
    Payment,
    Status,
}

/// Per-order subscription manager
pub struct EventBridge {
    client: reqwest::Client,
    base_url: String,
    config: StreamConfig,
    unpaid: UnpaidOrderCache,
    subscriptions: Mutex<HashMap<(StreamKind, i64), SubscriptionHandle>>,
}

impl EventBridge {
    /// Create a bridge sharing the gateway's base URL.
    ///
    /// The bridge keeps its own transport: subscriptions are long-lived,
    /// so the gateway's per-request timeout must not apply to them.
    pub fn new(gateway: &HttpClient, unpaid: UnpaidOrderCache) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build event stream client");

        Self {
            client,
            base_url: gateway.base_url().trim_end_matches('/').to_string(),
            config: StreamConfig::default(),
            unpaid,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    /// Set the stream configuration (reconnect policy).
    pub fn with_stream_config(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    /// Watch one order's payment stream.
    ///
    /// `connected` and `heartbeat` events are logged and ignored. Only a
    /// `payment-status` with status SUCCESS reaches `on_success`; other
    /// statuses are logged. A payload that fails to decode goes to
    /// `on_error` and the subscription keeps receiving.
    pub fn watch_payment<F, E>(&self, order_id: i64, on_success: F, on_error: E)
    where
        F: Fn(PaymentStatusPayload) + Send + Sync + 'static,
        E: Fn(ClientError) + Send + Sync + 'static,
    {
        let url = format!("{}/payment/events/{}", self.base_url, order_id);
        let on_error = Arc::new(on_error);
        let stream_error = {
            let on_error = on_error.clone();
            move |err| on_error(err)
        };

        let dispatch = move |event: SseEvent| match event.name.as_str() {
            EVENT_CONNECTED => tracing::debug!(order_id, "Payment stream connected"),
            EVENT_HEARTBEAT => tracing::trace!(order_id, "Payment stream heartbeat"),
            EVENT_PAYMENT_STATUS => {
                match serde_json::from_str::<PaymentStatusPayload>(&event.data) {
                    Ok(payload) if payload.is_success() => on_success(payload),
                    Ok(payload) => {
                        tracing::warn!(order_id, status = %payload.status, "Ignoring non-success payment status");
                    }
                    Err(e) => on_error(ClientError::Decode(e.to_string())),
                }
            }
            other => tracing::trace!(order_id, event = other, "Unhandled payment stream event"),
        };

        let handle = spawn_event_stream(
            self.client.clone(),
            url,
            self.config.clone(),
            dispatch,
            stream_error,
        );
        self.register(StreamKind::Payment, order_id, handle);
    }

    /// Watch one order's status stream. Every snapshot reaches
    /// `on_change`, in receipt order; deciding that a terminal status
    /// means "stop tracking" is the caller's call (or use
    /// [`EventBridge::track_status`]).
    pub fn watch_status<F, E>(&self, order_id: i64, on_change: F, on_error: E)
    where
        F: Fn(OrderDetail) + Send + Sync + 'static,
        E: Fn(ClientError) + Send + Sync + 'static,
    {
        let url = format!("{}/orders/{}/stream", self.base_url, order_id);
        let on_error = Arc::new(on_error);
        let stream_error = {
            let on_error = on_error.clone();
            move |err| on_error(err)
        };

        let dispatch = move |event: SseEvent| match event.name.as_str() {
            EVENT_CONNECTED => tracing::debug!(order_id, "Order status stream connected"),
            EVENT_HEARTBEAT => tracing::trace!(order_id, "Order status stream heartbeat"),
            EVENT_ORDER_STATUS_CHANGED => match serde_json::from_str::<OrderDetail>(&event.data) {
                Ok(order) => on_change(order),
                Err(e) => on_error(ClientError::Decode(e.to_string())),
            },
            other => tracing::trace!(order_id, event = other, "Unhandled order stream event"),
        };

        let handle = spawn_event_stream(
            self.client.clone(),
            url,
            self.config.clone(),
            dispatch,
            stream_error,
        );
        self.register(StreamKind::Status, order_id, handle);
    }

    /// Watch an order's payment stream and keep the unpaid cache honest:
    /// the first SUCCESS removes the order from the cache, then `on_paid`
    /// runs. The subscription stays open until `unwatch`/`shutdown`.
    pub fn track_unpaid<F, E>(&self, session_id: &str, order_id: i64, on_paid: F, on_error: E)
    where
        F: Fn(PaymentStatusPayload) + Send + Sync + 'static,
        E: Fn(ClientError) + Send + Sync + 'static,
    {
        let unpaid = self.unpaid.clone();
        let session_id = session_id.to_string();
        let settled = Arc::new(AtomicBool::new(false));

        self.watch_payment(
            order_id,
            move |payload| {
                if settled.swap(true, Ordering::SeqCst) {
                    return;
                }
                unpaid.remove(&session_id, order_id);
                tracing::info!(order_id, amount = payload.amount, "Order paid");
                on_paid(payload);
            },
            on_error,
        );
    }

    /// Watch an order's status stream and drop it from the unpaid cache
    /// on the first terminal snapshot. `on_change` still sees every
    /// snapshot, terminal included.
    pub fn track_status<F, E>(&self, session_id: &str, order_id: i64, on_change: F, on_error: E)
    where
        F: Fn(OrderDetail) + Send + Sync + 'static,
        E: Fn(ClientError) + Send + Sync + 'static,
    {
        let unpaid = self.unpaid.clone();
        let session_id = session_id.to_string();
        let settled = Arc::new(AtomicBool::new(false));

        self.watch_status(
            order_id,
            move |order| {
                if order.status.is_terminal() && !settled.swap(true, Ordering::SeqCst) {
                    unpaid.remove(&session_id, order_id);
                    tracing::info!(order_id, status = ?order.status, "Order settled");
                }
                on_change(order);
            },
            on_error,
        );
    }

    fn register(&self, kind: StreamKind, order_id: i64, handle: SubscriptionHandle) {
        let mut subs = self.subscriptions.lock().unwrap();
        if subs.insert((kind, order_id), handle).is_some() {
            // the displaced handle cancels its task on drop
            tracing::debug!(order_id, ?kind, "Replacing existing subscription");
        }
    }

    /// Orders with at least one open subscription.
    pub fn watched_orders(&self) -> Vec<i64> {
        let subs = self.subscriptions.lock().unwrap();
        let mut ids: Vec<i64> = subs.keys().map(|(_, id)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Close both of an order's subscriptions, waiting for the transports
    /// to shut down. Idempotent.
    pub async fn unwatch(&self, order_id: i64) {
        let handles: Vec<SubscriptionHandle> = {
            let mut subs = self.subscriptions.lock().unwrap();
            [StreamKind::Payment, StreamKind::Status]
                .into_iter()
                .filter_map(|kind| subs.remove(&(kind, order_id)))
                .collect()
        };
        for handle in handles {
            handle.close().await;
        }
    }

    /// Close every open subscription. Teardown must not leak a single
    /// transport, however many orders were being watched.
    pub async fn shutdown(&self) {
        let handles: Vec<SubscriptionHandle> = {
            let mut subs = self.subscriptions.lock().unwrap();
            subs.drain().map(|(_, handle)| handle).collect()
        };
        let count = handles.len();
        for handle in handles {
            handle.close().await;
        }
        if count > 0 {
            tracing::debug!(count, "Event bridge shut down");
        }
    }
}
