//! Promotion Model

use serde::{Deserialize, Serialize};

/// Active promotion as returned by `GET promotions/active`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub promotion_id: i64,
    pub code: String,
    pub promotion_type: String,
    pub discount_percentage: i32,
    /// ISO date strings owned by the backend
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub total_quantity: i32,
    pub used_count: i32,
    pub remaining_count: i32,
    /// Minimum cart total in VND for the code to apply
    pub min_order_amount: i64,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Promotion {
    /// Discounted total for a given cart amount, rounded down.
    pub fn apply(&self, total: i64) -> i64 {
        total - total * self.discount_percentage as i64 / 100
    }
}
