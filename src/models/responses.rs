//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheEntry, StoreStats};

/// Response body for GET /stores/:store/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The store the entry lives in
    pub store: String,
    /// The requested key
    pub key: String,
    /// The stored payload, decoded as UTF-8 (lossy)
    pub value: String,
    /// Expiration timestamp in RFC 3339 format
    pub expires_at: String,
    /// Remaining lifetime in whole seconds
    pub ttl_remaining: u64,
}

impl GetResponse {
    /// Builds the response from a cache entry.
    pub fn from_entry(store: impl Into<String>, entry: &CacheEntry) -> Self {
        Self {
            store: store.into(),
            key: entry.key().to_string(),
            value: String::from_utf8_lossy(entry.data()).into_owned(),
            expires_at: entry.expiration().to_rfc3339(),
            ttl_remaining: entry.ttl_remaining().as_secs(),
        }
    }
}

/// Response body for PUT /stores/:store/:key
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    pub store: String,
    pub key: String,
    /// TTL applied, in seconds
    pub ttl: u64,
}

impl SetResponse {
    pub fn new(store: impl Into<String>, key: impl Into<String>, ttl: u64) -> Self {
        let store = store.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' set in store '{}'", key, store),
            store,
            key,
            ttl,
        }
    }
}

/// Response body for DELETE /stores/:store/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    pub store: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(store: impl Into<String>, key: impl Into<String>) -> Self {
        let store = store.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted from store '{}'", key, store),
            store,
            key,
        }
    }
}

/// Response body for DELETE /stores/:store
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    pub store: String,
    /// Number of entries dropped
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(store: impl Into<String>, cleared: usize) -> Self {
        let store = store.into();
        Self {
            message: format!("Store '{}' cleared", store),
            store,
            cleared,
        }
    }
}

/// Response body for GET /stores
#[derive(Debug, Clone, Serialize)]
pub struct StoresResponse {
    /// Names of all stores created so far
    pub stores: Vec<String>,
}

/// Response body for GET /stats/:store
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub store: String,
    #[serde(flatten)]
    pub stats: StoreStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(store: impl Into<String>, stats: StoreStats) -> Self {
        Self {
            store: store.into(),
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
