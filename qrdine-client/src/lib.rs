//! qrdine-client - client layer for the QR table-ordering backend
//!
//! Local session/auth/unpaid-order state over an injected key-value
//! store, a typed HTTP gateway, and per-order server-push subscriptions.
//! A UI shell wires the pieces together:
//!
//! ```no_run
//! use qrdine_client::{
//!     ClientConfig, EventBridge, MemoryStore, TableSessionStore, UnpaidOrderCache, UserAuthStore,
//! };
//! use std::sync::Arc;
//!
//! let transient = Arc::new(MemoryStore::new());
//! let persistent = Arc::new(MemoryStore::new());
//!
//! let sessions = TableSessionStore::new(transient.clone());
//! let auth = UserAuthStore::new(persistent);
//! let unpaid = UnpaidOrderCache::new(transient);
//!
//! let gateway = ClientConfig::new("http://localhost:8080/api")
//!     .with_token_provider(Arc::new(auth.clone()))
//!     .build_http_client();
//! let bridge = EventBridge::new(&gateway, unpaid.clone());
//! ```

pub mod auth;
pub mod bridge;
pub mod config;
pub mod error;
pub mod http;
pub mod promo;
pub mod session;
pub mod sse;
pub mod storage;
pub mod suggest;
pub mod unpaid;

pub use auth::{AuthEvent, StoredIdentity, TokenProvider, UserAuthStore, DEFAULT_AUTH_TTL};
pub use bridge::EventBridge;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, RatingPhoto, RatingSubmission};
pub use promo::{find_and_validate, validate_promotion, PromoError};
pub use session::{TableSession, TableSessionStore, DEFAULT_SESSION_TTL};
pub use sse::{ReconnectPolicy, SseEvent, StreamConfig, SubscriptionHandle};
pub use storage::{keys, FileStore, KvStore, MemoryStore};
pub use suggest::{resolve_or_fallback, DishSlot, ResolvedSuggestion, SuggestedDish};
pub use unpaid::UnpaidOrderCache;

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use shared::events::PaymentStatusPayload;
pub use shared::{BankAccount, MealSuggestion, OrderDetail, OrderStatus, Product, Promotion, UserIdentity};
