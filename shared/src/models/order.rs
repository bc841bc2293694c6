//! Order Model

use serde::{Deserialize, Serialize};

/// Order status (server-owned; unknown values are tolerated)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Served,
    Paid,
    Completed,
    Done,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Terminal/paid statuses need no further client-side tracking.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Completed | Self::Done)
    }

    /// The pay action is gated on SERVED only.
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Served)
    }
}

/// Line item of a placed order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub order_item_id: i64,
    pub product_id: i64,
    pub product_name: String,
    /// Unit price in VND
    pub product_price: i64,
    pub quantity: i32,
    #[serde(default)]
    pub note: Option<String>,
}

/// Full order detail as returned by `GET orders/{orderId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order_id: i64,
    pub customer_name: String,
    pub table_number: i32,
    /// Total in VND
    pub total_amount: i64,
    /// Backend-formatted timestamp, displayed as-is
    pub order_time: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItemDetail>,
}

/// Item of an order being placed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Payload for `POST orders/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub session_id: String,
    pub table_number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_code: Option<String>,
    pub total: i64,
    pub items: Vec<CreateOrderItem>,
}
