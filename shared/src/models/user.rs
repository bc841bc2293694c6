//! User Identity Model

use serde::{Deserialize, Serialize};

/// Authenticated customer identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: i64,
    pub name: String,
    pub phone_number: String,
}
