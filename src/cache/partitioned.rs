//! Partitioned Cache Module
//!
//! Routes operations to named stores, creating a store on its first write.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStore, StoreStats};

// == Cache ==
/// A set of independently locked, named stores of expiring entries.
///
/// The map lock only guards store membership. It is released before a
/// store's own lock is taken, so work on different stores never contends.
/// Stores are never removed once created.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// use std::time::Duration;
/// use ttl_stores::Cache;
///
/// let cache = Cache::new();
/// cache.add("roles", "all", "[...]", Duration::from_secs(5)).await;
///
/// let entry = cache.get("roles", "all").await.unwrap();
/// assert_eq!(&entry.data()[..], b"[...]");
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Cache {
    stores: RwLock<HashMap<String, Arc<CacheStore>>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache with no stores.
    pub fn new() -> Self {
        Self::default()
    }

    async fn store(&self, name: &str) -> Option<Arc<CacheStore>> {
        self.stores.read().await.get(name).cloned()
    }

    async fn store_or_create(&self, name: &str) -> Arc<CacheStore> {
        if let Some(store) = self.store(name).await {
            return store;
        }

        let mut stores = self.stores.write().await;
        stores
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(store = name, "Created cache store");
                Arc::new(CacheStore::new(name))
            })
            .clone()
    }

    // == Add ==
    /// Stores `data` under `key` in `store` for `ttl`, creating the store if
    /// needed.
    ///
    /// Writing an existing key refreshes it in place: new payload, new
    /// deadline, same position. The payload is owned by the cache afterwards.
    pub async fn add(&self, store: &str, key: &str, data: impl Into<Bytes>, ttl: Duration) {
        let store = self.store_or_create(store).await;
        store.add_entry(key, data.into(), ttl).await;
    }

    // == Get ==
    /// Returns the entry under `key` in `store`, or `None` if either is
    /// unknown. Never creates a store.
    pub async fn get(&self, store: &str, key: &str) -> Option<CacheEntry> {
        self.store(store).await?.get(key).await
    }

    // == Clear ==
    /// Empties `store` and cancels all of its pending expirations.
    ///
    /// Returns the number of entries dropped; unknown stores are a no-op.
    pub async fn clear(&self, store: &str) -> usize {
        match self.store(store).await {
            Some(store) => store.clear().await,
            None => 0,
        }
    }

    // == Remove ==
    /// Removes a single entry before its deadline.
    ///
    /// Returns false if the store or key is unknown.
    pub async fn remove(&self, store: &str, key: &str) -> bool {
        match self.store(store).await {
            Some(store) => store.remove(key).await,
            None => false,
        }
    }

    /// Names of every store created so far, sorted.
    pub async fn store_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Keys of `store` in insertion order.
    pub async fn keys(&self, store: &str) -> Vec<String> {
        match self.store(store).await {
            Some(store) => store.keys().await,
            None => Vec::new(),
        }
    }

    /// Number of entries currently in `store`.
    pub async fn entry_count(&self, store: &str) -> usize {
        match self.store(store).await {
            Some(store) => store.len().await,
            None => 0,
        }
    }

    // == Stats ==
    /// Statistics for `store`, or `None` if it was never created.
    pub async fn stats(&self, store: &str) -> Option<StoreStats> {
        Some(self.store(store).await?.stats().await)
    }
}
