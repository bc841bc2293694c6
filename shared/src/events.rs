//! Server-push event payloads
//!
//! Named events carried on the two SSE streams:
//! `payment/events/{orderId}` and `orders/{orderId}/stream`.

use serde::{Deserialize, Serialize};

/// Connection acknowledgement, logged and ignored.
pub const EVENT_CONNECTED: &str = "connected";
/// Periodic keepalive, logged and ignored.
pub const EVENT_HEARTBEAT: &str = "heartbeat";
/// Payment settlement result for one order.
pub const EVENT_PAYMENT_STATUS: &str = "payment-status";
/// Full order snapshot after any status change.
pub const EVENT_ORDER_STATUS_CHANGED: &str = "order-status-changed";

/// Payment status reported by the gateway.
pub const PAYMENT_SUCCESS: &str = "SUCCESS";

/// Payload of a `payment-status` event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusPayload {
    pub order_id: i64,
    pub payment_id: i64,
    /// Gateway-owned status string; only SUCCESS drives the paid path
    pub status: String,
    /// Settled amount in VND
    pub amount: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
}

impl PaymentStatusPayload {
    pub fn is_success(&self) -> bool {
        self.status == PAYMENT_SUCCESS
    }
}
