//! Bank Account Model

use serde::{Deserialize, Serialize};

/// Bank account for transfer payments, from `GET banks/active`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: i64,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    #[serde(default)]
    pub qr_code_image_url: Option<String>,
    pub status: String,
}

impl BankAccount {
    /// Only ACTIVE accounts may be shown for payment.
    pub fn is_active(&self) -> bool {
        self.status == "ACTIVE"
    }
}
