//! Customer auth store
//!
//! Persists the signed-in customer's identity and token material in the
//! long-lived store, fail closed: a record that is malformed, incomplete,
//! or missing a numeric expiry is treated as no identity at all and the
//! slot is wiped. This posture is deliberate — an identity blob must never
//! be trusted past what it can prove.
//!
//! Every store mutation is followed by an [`AuthEvent`] on a broadcast
//! channel so independently rendered UI regions (navigation bar, history
//! page) observe sign-in state without polling.

use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::storage::{keys, KvStore};
use serde::{Deserialize, Serialize};
use shared::client::LoginRequest;
use shared::util::now_millis;
use shared::UserIdentity;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Identities expire two hours after sign-in unless refreshed.
pub const DEFAULT_AUTH_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Identity blob persisted under [`keys::USER_DATA`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredIdentity {
    pub user_id: i64,
    pub name: String,
    pub phone_number: String,
    /// Absolute deadline, epoch milliseconds
    pub expires_at: i64,
}

impl StoredIdentity {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_id: self.user_id,
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

/// Sign-in state change, broadcast after the store write completes.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(UserIdentity),
    SignedOut,
}

/// Source of the bearer token attached to authenticated requests.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Store for the signed-in customer
#[derive(Clone)]
pub struct UserAuthStore {
    store: Arc<dyn KvStore>,
    events: broadcast::Sender<AuthEvent>,
}

/// Loose mirror of [`StoredIdentity`] used to validate untrusted blobs.
/// Any missing or mistyped field downgrades the whole record to invalid.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdentity {
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

impl UserAuthStore {
    /// Create a store over the persistent (cross-visit) scope.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { store, events }
    }

    /// Observe sign-in state changes. Events are fired after the
    /// corresponding store write; no ordering is guaranteed beyond that.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Persist an identity with the default TTL.
    pub fn save(&self, user: &UserIdentity) -> StoredIdentity {
        self.save_with_ttl(user, DEFAULT_AUTH_TTL)
    }

    /// Persist an identity with an explicit TTL.
    pub fn save_with_ttl(&self, user: &UserIdentity, ttl: Duration) -> StoredIdentity {
        let stored = StoredIdentity {
            user_id: user.user_id,
            name: user.name.clone(),
            phone_number: user.phone_number.clone(),
            expires_at: now_millis() + ttl.as_millis() as i64,
        };
        match serde_json::to_string(&stored) {
            Ok(blob) => self.store.set(keys::USER_DATA, &blob),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize identity"),
        }
        self.emit(AuthEvent::SignedIn(user.clone()));
        stored
    }

    /// Persist bearer and refresh tokens alongside the identity.
    pub fn save_tokens(&self, access_token: &str, refresh_token: Option<&str>) {
        self.store.set(keys::ACCESS_TOKEN, access_token);
        match refresh_token {
            Some(token) => self.store.set(keys::REFRESH_TOKEN, token),
            None => self.store.remove(keys::REFRESH_TOKEN),
        }
    }

    /// Current identity, if present, well-formed and unexpired.
    ///
    /// Fail closed: a record without a numeric `expiresAt` is invalid even
    /// when every other field checks out — absence of the deadline is NOT
    /// "never expires". Any invalid record is cleared on the spot.
    pub fn read(&self) -> Option<StoredIdentity> {
        let blob = self.store.get(keys::USER_DATA)?;

        let raw: RawIdentity = match serde_json::from_str(&blob) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed identity record, clearing auth state");
                self.clear();
                return None;
            }
        };

        let Some(expires_at) = raw.expires_at else {
            tracing::warn!("Identity record has no expiry, clearing auth state");
            self.clear();
            return None;
        };

        if now_millis() > expires_at {
            tracing::debug!("Identity expired, clearing auth state");
            self.clear();
            return None;
        }

        match (raw.user_id, raw.name, raw.phone_number) {
            (Some(user_id), Some(name), Some(phone_number)) => Some(StoredIdentity {
                user_id,
                name,
                phone_number,
                expires_at,
            }),
            _ => {
                tracing::warn!("Incomplete identity record, clearing auth state");
                self.clear();
                return None;
            }
        }
    }

    /// Bearer token, only while a valid identity exists.
    pub fn access_token(&self) -> Option<String> {
        self.read()?;
        self.store.get(keys::ACCESS_TOKEN)
    }

    /// Refresh token, only while a valid identity exists.
    pub fn refresh_token(&self) -> Option<String> {
        self.read()?;
        self.store.get(keys::REFRESH_TOKEN)
    }

    /// Remove identity and both tokens as one logical operation.
    /// Idempotent.
    pub fn clear(&self) {
        self.store.remove(keys::USER_DATA);
        self.store.remove(keys::ACCESS_TOKEN);
        self.store.remove(keys::REFRESH_TOKEN);
        self.emit(AuthEvent::SignedOut);
    }

    /// Sign in against the backend and establish the local session.
    ///
    /// A response that does not explicitly grant the CLIENT role is
    /// refused outright — nothing is stored.
    pub async fn login(
        &self,
        http: &HttpClient,
        request: &LoginRequest,
    ) -> ClientResult<StoredIdentity> {
        let response = http.login(request).await?;

        if !response.is_client() {
            tracing::warn!(role = ?response.role, "Refusing login without CLIENT role");
            return Err(ClientError::Forbidden(
                "only customer accounts may sign in here".to_string(),
            ));
        }

        if let Some(token) = &response.token {
            self.save_tokens(token, response.refresh_token.as_deref());
        }

        let identity = UserIdentity {
            user_id: response.user_id,
            name: response.name.clone(),
            phone_number: response.phone_number.clone(),
        };
        Ok(self.save(&identity))
    }

    /// Sign out locally.
    pub fn logout(&self) {
        self.clear();
    }

    fn emit(&self, event: AuthEvent) {
        if let Err(e) = self.events.send(event) {
            tracing::trace!("No auth event subscribers: {}", e);
        }
    }
}

impl TokenProvider for UserAuthStore {
    fn bearer_token(&self) -> Option<String> {
        self.access_token()
    }
}
