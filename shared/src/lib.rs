//! Shared types for the qrdine client
//!
//! Wire DTOs exchanged with the ordering backend, the server-owned order
//! status enum, SSE event payloads, and small time utilities. These types
//! are kept in their own crate so a future server-side consumer can reuse
//! them without pulling in the client machinery.

pub mod client;
pub mod events;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Model re-exports (for convenient access)
pub use models::bank::BankAccount;
pub use models::order::{OrderDetail, OrderItemDetail, OrderStatus};
pub use models::product::{Category, Product};
pub use models::promotion::Promotion;
pub use models::suggestion::MealSuggestion;
pub use models::user::UserIdentity;
