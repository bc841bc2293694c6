//! Table session store
//!
//! A QR scan binds the current visit to a physical table via a
//! server-issued session. The session lives in the transient store and
//! expires lazily: the first read past the deadline purges it, so a stale
//! session is never observable.

use crate::storage::{keys, KvStore};
use serde::{Deserialize, Serialize};
use shared::util::now_millis;
use std::sync::Arc;
use std::time::Duration;

/// Sessions expire 30 minutes after the QR scan unless recreated.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Table session blob, persisted under [`keys::TABLE_SESSION`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSession {
    /// Opaque, server-issued
    pub session_id: String,
    pub table_number: i32,
    /// Absolute deadline, epoch milliseconds
    pub expires_at: i64,
}

/// Store for the current table session
#[derive(Clone)]
pub struct TableSessionStore {
    store: Arc<dyn KvStore>,
}

impl TableSessionStore {
    /// Create a store over the transient (per-visit) scope.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Persist a freshly issued session with the default TTL, replacing
    /// any prior one.
    pub fn create(&self, session_id: impl Into<String>, table_number: i32) -> TableSession {
        self.create_with_ttl(session_id, table_number, DEFAULT_SESSION_TTL)
    }

    /// Persist a freshly issued session with an explicit TTL.
    pub fn create_with_ttl(
        &self,
        session_id: impl Into<String>,
        table_number: i32,
        ttl: Duration,
    ) -> TableSession {
        let session = TableSession {
            session_id: session_id.into(),
            table_number,
            expires_at: now_millis() + ttl.as_millis() as i64,
        };
        match serde_json::to_string(&session) {
            Ok(blob) => self.store.set(keys::TABLE_SESSION, &blob),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize table session"),
        }
        tracing::debug!(table = table_number, "Table session created");
        session
    }

    /// Current session, if present and unexpired. An expired or malformed
    /// blob is purged and reads as absent; absence is the only not-found
    /// signal.
    pub fn read(&self) -> Option<TableSession> {
        let blob = self.store.get(keys::TABLE_SESSION)?;

        let session: TableSession = match serde_json::from_str(&blob) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed table session, clearing");
                self.clear();
                return None;
            }
        };

        if now_millis() > session.expires_at {
            tracing::debug!(table = session.table_number, "Table session expired, clearing");
            self.clear();
            return None;
        }

        Some(session)
    }

    /// True when a valid session exists.
    pub fn has_valid_session(&self) -> bool {
        self.read().is_some()
    }

    /// Time left before expiry; zero once expired or absent.
    pub fn remaining_time(&self) -> Duration {
        match self.read() {
            Some(session) => {
                let remaining = session.expires_at - now_millis();
                Duration::from_millis(remaining.max(0) as u64)
            }
            None => Duration::ZERO,
        }
    }

    /// Explicit termination. Idempotent.
    pub fn clear(&self) {
        self.store.remove(keys::TABLE_SESSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, TableSessionStore) {
        let raw = Arc::new(MemoryStore::new());
        let sessions = TableSessionStore::new(raw.clone());
        (raw, sessions)
    }

    #[test]
    fn test_create_then_read_roundtrip() {
        let (_, sessions) = store();
        sessions.create("sess-7", 7);

        let session = sessions.read().expect("session should be readable");
        assert_eq!(session.session_id, "sess-7");
        assert_eq!(session.table_number, 7);
        assert!(sessions.remaining_time() > Duration::ZERO);
    }

    #[test]
    fn test_create_overwrites_prior_session() {
        let (_, sessions) = store();
        sessions.create("first", 1);
        sessions.create("second", 2);

        let session = sessions.read().unwrap();
        assert_eq!(session.session_id, "second");
        assert_eq!(session.table_number, 2);
    }

    #[test]
    fn test_expired_session_purged_on_read() {
        let (raw, sessions) = store();
        let expired = TableSession {
            session_id: "sess-7".into(),
            table_number: 7,
            expires_at: now_millis() - 60_000,
        };
        raw.set(
            keys::TABLE_SESSION,
            &serde_json::to_string(&expired).unwrap(),
        );

        assert!(sessions.read().is_none());
        // slot is gone, not just filtered: expiry left no trace
        assert!(raw.get(keys::TABLE_SESSION).is_none());
        // idempotent: a second read still finds nothing
        assert!(sessions.read().is_none());
        assert_eq!(sessions.remaining_time(), Duration::ZERO);
    }

    #[test]
    fn test_malformed_blob_reads_as_absent_and_self_heals() {
        let (raw, sessions) = store();
        raw.set(keys::TABLE_SESSION, "{half a blob");

        assert!(sessions.read().is_none());
        assert!(raw.get(keys::TABLE_SESSION).is_none());
    }

    #[test]
    fn test_ttl_scenario() {
        let (raw, sessions) = store();
        // plenty of TTL left: readable, countdown positive
        sessions.create_with_ttl("sess-7", 7, Duration::from_secs(120));
        assert!(sessions.has_valid_session());
        let remaining = sessions.remaining_time();
        assert!(remaining > Duration::from_secs(110) && remaining <= Duration::from_secs(120));

        // force the deadline into the past, as if 31 minutes elapsed
        let mut session = sessions.read().unwrap();
        session.expires_at = now_millis() - 1;
        raw.set(
            keys::TABLE_SESSION,
            &serde_json::to_string(&session).unwrap(),
        );
        assert!(sessions.read().is_none());
        assert_eq!(sessions.remaining_time(), Duration::ZERO);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_, sessions) = store();
        sessions.create("sess-7", 7);
        sessions.clear();
        assert!(sessions.read().is_none());
        sessions.clear();
        assert!(sessions.read().is_none());
    }
}
