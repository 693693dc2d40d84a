//! Cache Store Module
//!
//! One named partition of the cache: an insertion-ordered entry list guarded
//! by its own lock, plus the cancellation scope that owns every pending
//! expiration timer of the store.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::entry::{CacheEntry, EntryId, Expiry, Node};
use crate::cache::list::EntryList;
use crate::cache::stats::{StoreCounters, StoreStats};
use crate::tasks::spawn_expiration;

// == Store State ==
/// Everything guarded by the store lock.
#[derive(Debug)]
struct StoreState {
    entries: EntryList,
    /// Parent of every entry token; cancelled and replaced on clear
    scope: CancellationToken,
    /// Last generation handed out; never reset, so ids stay unique across clears
    generation: u64,
}

impl StoreState {
    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    // == Remove Entry ==
    /// Cancels the timer of the entry under `key` and unlinks it.
    fn remove_entry(&mut self, key: &str) -> Option<Node> {
        let id = self.entries.find(key)?;
        let node = self.entries.unlink(id)?;
        node.token.cancel();
        Some(node)
    }
}

// == Cache Store ==
/// A single named store of expiring entries.
#[derive(Debug)]
pub struct CacheStore {
    name: String,
    state: RwLock<StoreState>,
    counters: StoreCounters,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store with a fresh cancellation scope.
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(StoreState {
                entries: EntryList::new(),
                scope: CancellationToken::new(),
                generation: 0,
            }),
            counters: StoreCounters::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Add Entry ==
    /// Inserts `data` under `key`, or refreshes the existing entry in place.
    ///
    /// A refresh cancels the pending timer, replaces the payload and deadline,
    /// and keeps the entry's list position. Either way a new expiration timer
    /// is scheduled; this never waits on it.
    pub(crate) async fn add_entry(self: &Arc<Self>, key: &str, data: Bytes, ttl: Duration) {
        let mut state = self.state.write().await;
        let expiry = Expiry::after(ttl);
        let generation = state.next_generation();
        let token = state.scope.child_token();

        let existing = state.entries.find(key);
        let refreshed = existing.and_then(|id| state.entries.rearm(id, generation));

        let id = match refreshed {
            Some(id) => {
                if let Some(node) = state.entries.get_mut(id) {
                    node.token.cancel();
                    node.token = token.clone();
                    node.data = data;
                    node.expiry = expiry;
                }
                self.counters.record_refresh();
                debug!(store = %self.name, key, ?ttl, "Refreshed cache entry");
                id
            }
            None => {
                let node = Node::new(key.to_string(), data, expiry, generation, token.clone());
                let id = state.entries.push_back(node);
                self.counters.record_insert();
                debug!(store = %self.name, key, ?ttl, "Inserted cache entry");
                id
            }
        };

        spawn_expiration(Arc::downgrade(self), id, expiry.deadline, token);
    }

    // == Expire ==
    /// Removes the entry instance `id` once its timer has fired.
    ///
    /// Cancellation is re-checked under the write lock, so a timer that lost
    /// the race against a refresh or a clear does nothing.
    pub(crate) async fn expire(&self, id: EntryId, token: &CancellationToken) -> bool {
        let mut state = self.state.write().await;
        if token.is_cancelled() {
            return false;
        }

        match state.entries.unlink(id) {
            Some(node) => {
                self.counters.record_expiration();
                debug!(store = %self.name, key = %node.key, "Expired cache entry");
                true
            }
            None => false,
        }
    }

    // == Get ==
    /// Looks up `key` under the shared lock.
    ///
    /// Entries past their deadline whose timer has not run yet are still
    /// returned.
    pub(crate) async fn get(&self, key: &str) -> Option<CacheEntry> {
        let state = self.state.read().await;
        let entry = state
            .entries
            .find(key)
            .and_then(|id| state.entries.get(id))
            .map(Node::snapshot);

        match entry {
            Some(_) => self.counters.record_hit(),
            None => self.counters.record_miss(),
        }
        entry
    }

    // == Remove ==
    /// Explicitly removes `key`, cancelling its timer.
    ///
    /// Returns false if the key is not present.
    pub(crate) async fn remove(&self, key: &str) -> bool {
        let mut state = self.state.write().await;
        match state.remove_entry(key) {
            Some(_) => {
                self.counters.record_removal();
                debug!(store = %self.name, key, "Removed cache entry");
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry and cancels all pending timers through the store
    /// scope, then arms a new scope for later inserts.
    ///
    /// Returns the number of entries dropped.
    pub(crate) async fn clear(&self) -> usize {
        let mut state = self.state.write().await;
        let dropped = state.entries.clear();
        state.scope.cancel();
        state.scope = CancellationToken::new();

        self.counters.record_clear();
        debug!(store = %self.name, dropped, "Cleared cache store");
        dropped
    }

    /// Keys in insertion order.
    pub(crate) async fn keys(&self) -> Vec<String> {
        self.state.read().await.entries.keys()
    }

    pub(crate) async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub(crate) async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    // == Stats ==
    pub(crate) async fn stats(&self) -> StoreStats {
        let total_entries = self.len().await;
        self.counters.snapshot(total_entries)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn store() -> Arc<CacheStore> {
        Arc::new(CacheStore::new("test"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_new() {
        let store = store();
        assert_eq!(store.name(), "test");
        assert!(store.is_empty().await);
        assert_eq!(store.stats().await, StoreStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_and_get() {
        let store = store();
        store
            .add_entry("key1", Bytes::from_static(b"value1"), Duration::from_secs(60))
            .await;

        let entry = store.get("key1").await.unwrap();
        assert_eq!(&entry.data()[..], b"value1");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_nonexistent() {
        let store = store();
        store
            .add_entry("key1", Bytes::from_static(b"value1"), Duration::from_secs(60))
            .await;

        assert!(store.get("missing").await.is_none());
        let stats = store.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_keeps_position() {
        let store = store();
        let ttl = Duration::from_secs(60);
        store.add_entry("a", Bytes::from_static(b"1"), ttl).await;
        store.add_entry("b", Bytes::from_static(b"2"), ttl).await;
        store.add_entry("c", Bytes::from_static(b"3"), ttl).await;

        store.add_entry("a", Bytes::from_static(b"updated"), ttl).await;

        assert_eq!(store.keys().await, vec!["a", "b", "c"]);
        assert_eq!(&store.get("a").await.unwrap().data()[..], b"updated");
        let stats = store.stats().await;
        assert_eq!(stats.inserts, 3);
        assert_eq!(stats.refreshes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires() {
        let store = store();
        store
            .add_entry("key1", Bytes::from_static(b"value1"), Duration::from_millis(100))
            .await;

        sleep(Duration::from_millis(99)).await;
        assert!(store.get("key1").await.is_some());

        sleep(Duration::from_millis(2)).await;
        assert!(store.get("key1").await.is_none());
        assert!(store.is_empty().await);
        assert_eq!(store.stats().await.expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_expires_promptly() {
        let store = store();
        store
            .add_entry("key1", Bytes::from_static(b"value1"), Duration::ZERO)
            .await;

        sleep(Duration::from_millis(1)).await;
        assert!(store.get("key1").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_cancels_old_timer() {
        let store = store();
        let ttl = Duration::from_millis(100);
        store.add_entry("key1", Bytes::from_static(b"d1"), ttl).await;

        sleep(Duration::from_millis(50)).await;
        store.add_entry("key1", Bytes::from_static(b"d2"), ttl).await;

        sleep(Duration::from_millis(70)).await;
        let entry = store.get("key1").await.unwrap();
        assert_eq!(&entry.data()[..], b"d2");
        assert_eq!(store.stats().await.expirations, 0);

        sleep(Duration::from_millis(40)).await;
        assert!(store.get("key1").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_remove_refreshed_entry() {
        let store = store();
        store
            .add_entry("key1", Bytes::from_static(b"d1"), Duration::from_secs(60))
            .await;
        let stale_id = {
            let state = store.state.read().await;
            state.entries.find("key1").unwrap()
        };
        let stale_token = CancellationToken::new();

        store
            .add_entry("key1", Bytes::from_static(b"d2"), Duration::from_secs(60))
            .await;

        // Uncancelled token but an outdated generation.
        assert!(!store.expire(stale_id, &stale_token).await);
        assert_eq!(&store.get("key1").await.unwrap().data()[..], b"d2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_with_cancelled_token_is_noop() {
        let store = store();
        store
            .add_entry("key1", Bytes::from_static(b"d1"), Duration::from_secs(60))
            .await;
        let id = store.state.read().await.entries.find("key1").unwrap();
        let token = CancellationToken::new();
        token.cancel();

        assert!(!store.expire(id, &token).await);
        assert!(store.get("key1").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove() {
        let store = store();
        let ttl = Duration::from_millis(100);
        store.add_entry("a", Bytes::from_static(b"1"), ttl).await;
        store.add_entry("b", Bytes::from_static(b"2"), ttl).await;

        assert!(store.remove("a").await);
        assert!(!store.remove("a").await);
        assert!(!store.remove("missing").await);
        assert_eq!(store.keys().await, vec!["b"]);

        // A new instance under the removed key is not touched by the old timer.
        sleep(Duration::from_millis(50)).await;
        store.add_entry("a", Bytes::from_static(b"new"), ttl).await;
        sleep(Duration::from_millis(70)).await;
        assert_eq!(&store.get("a").await.unwrap().data()[..], b"new");
        assert_eq!(store.keys().await, vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_all_timers() {
        let store = store();
        let ttl = Duration::from_millis(100);
        store.add_entry("a", Bytes::from_static(b"1"), ttl).await;
        store.add_entry("b", Bytes::from_static(b"2"), ttl).await;

        assert_eq!(store.clear().await, 2);
        assert!(store.is_empty().await);

        sleep(Duration::from_millis(50)).await;
        store.add_entry("a", Bytes::from_static(b"again"), ttl).await;

        sleep(Duration::from_millis(70)).await;
        assert_eq!(&store.get("a").await.unwrap().data()[..], b"again");

        let stats = store.stats().await;
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.clears, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_empty_store() {
        let store = store();
        assert_eq!(store.clear().await, 0);
        assert_eq!(store.clear().await, 0);
        assert!(store.is_empty().await);
    }
}
