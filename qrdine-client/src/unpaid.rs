//! Unpaid-order cache
//!
//! Client-local index of the orders placed during the current table
//! session that have not yet been confirmed paid. Only IDs are cached;
//! the backend stays authoritative and [`UnpaidOrderCache::reconcile`]
//! re-fetches each order before anything is shown to the customer.
//!
//! The cache lives in the transient store, keyed by session id, so a new
//! QR scan starts empty and a dead session's list is simply orphaned.

use crate::error::ClientError;
use crate::http::HttpClient;
use crate::storage::{keys, KvStore};
use shared::OrderDetail;
use std::sync::Arc;

#[derive(Clone)]
pub struct UnpaidOrderCache {
    store: Arc<dyn KvStore>,
}

impl UnpaidOrderCache {
    /// Create a cache over the transient (per-visit) scope.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn key(session_id: &str) -> String {
        format!("{}{}", keys::UNPAID_ORDERS_PREFIX, session_id)
    }

    /// Cached order IDs, most recent first. Absent or malformed slots read
    /// as empty; this never errors.
    pub fn list(&self, session_id: &str) -> Vec<i64> {
        let Some(blob) = self.store.get(&Self::key(session_id)) else {
            return Vec::new();
        };
        match serde_json::from_str(&blob) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed unpaid-order list, treating as empty");
                Vec::new()
            }
        }
    }

    /// Record a newly placed order at the front of the list. Idempotent:
    /// an already-cached ID keeps its original position.
    pub fn add(&self, session_id: &str, order_id: i64) {
        let existing = self.list(session_id);
        if existing.contains(&order_id) {
            return;
        }
        let mut next = Vec::with_capacity(existing.len() + 1);
        next.push(order_id);
        next.extend(existing);
        self.write(session_id, &next);
    }

    /// Drop an order from the list. Idempotent.
    pub fn remove(&self, session_id: &str, order_id: i64) {
        let existing = self.list(session_id);
        let next: Vec<i64> = existing.into_iter().filter(|id| *id != order_id).collect();
        self.write(session_id, &next);
    }

    fn write(&self, session_id: &str, ids: &[i64]) {
        match serde_json::to_string(ids) {
            Ok(blob) => self.store.set(&Self::key(session_id), &blob),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize unpaid-order list"),
        }
    }

    /// Re-fetch every cached order from the backend, concurrently.
    ///
    /// Orders the backend reports terminal are dropped from the cache.
    /// Orders that fail to fetch stay cached (the next reconcile retries)
    /// but are omitted from the result. Returned orders keep cache order.
    pub async fn reconcile(
        &self,
        session_id: &str,
        http: &HttpClient,
    ) -> Vec<OrderDetail> {
        let ids = self.list(session_id);
        if ids.is_empty() {
            return Vec::new();
        }

        let fetches = ids.iter().map(|id| http.get_order(*id));
        let results: Vec<Result<OrderDetail, ClientError>> =
            futures::future::join_all(fetches).await;

        let mut fresh = Vec::new();
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(order) if order.status.is_terminal() => {
                    tracing::debug!(order_id = id, status = ?order.status, "Order settled, dropping from cache");
                    self.remove(session_id, id);
                }
                Ok(order) => fresh.push(order),
                Err(e) => {
                    tracing::warn!(order_id = id, error = %e, "Failed to reconcile order, keeping cached");
                }
            }
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn cache() -> (Arc<MemoryStore>, UnpaidOrderCache) {
        let raw = Arc::new(MemoryStore::new());
        let cache = UnpaidOrderCache::new(raw.clone());
        (raw, cache)
    }

    #[test]
    fn test_add_is_front_insert() {
        let (_, cache) = cache();
        cache.add("s", 1);
        cache.add("s", 2);
        cache.add("s", 3);
        assert_eq!(cache.list("s"), vec![3, 2, 1]);
    }

    #[test]
    fn test_duplicate_add_keeps_one_entry_in_place() {
        let (_, cache) = cache();
        cache.add("s", 42);
        cache.add("s", 7);
        cache.add("s", 42);
        assert_eq!(cache.list("s"), vec![7, 42]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_, cache) = cache();
        cache.add("s", 42);
        cache.remove("s", 42);
        assert!(cache.list("s").is_empty());
        // second remove is a no-op
        cache.remove("s", 42);
        assert!(cache.list("s").is_empty());
    }

    #[test]
    fn test_lists_are_keyed_by_session() {
        let (_, cache) = cache();
        cache.add("alive", 1);
        cache.add("dead", 2);
        assert_eq!(cache.list("alive"), vec![1]);
        assert_eq!(cache.list("dead"), vec![2]);
        // a session nobody writes to reads empty
        assert!(cache.list("fresh").is_empty());
    }

    #[test]
    fn test_malformed_slot_reads_empty() {
        let (raw, cache) = cache();
        raw.set("unpaidOrderIds:s", "{\"oops\":true}");
        assert!(cache.list("s").is_empty());
        // adding over a malformed slot starts a fresh list
        cache.add("s", 5);
        assert_eq!(cache.list("s"), vec![5]);
    }
}
