//! Cache Statistics Module
//!
//! Per-store counters for lookups, writes, and expirations.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Store Counters ==
/// Live counters owned by a store.
///
/// Atomic so that lookups, which only hold the shared lock, can record too.
#[derive(Debug, Default)]
pub(crate) struct StoreCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    refreshes: AtomicU64,
    expirations: AtomicU64,
    removals: AtomicU64,
    clears: AtomicU64,
}

impl StoreCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters out, pairing them with the current entry count.
    pub fn snapshot(&self, total_entries: usize) -> StoreStats {
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            total_entries,
        }
    }
}

// == Store Stats ==
/// Point-in-time statistics for one store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Lookups that found a live entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries created under a new key
    pub inserts: u64,
    /// Writes that refreshed an existing key in place
    pub refreshes: u64,
    /// Entries removed by their expiration timer
    pub expirations: u64,
    /// Entries removed explicitly
    pub removals: u64,
    /// Times the store was cleared
    pub clears: u64,
    /// Entries currently linked in the store
    pub total_entries: usize,
}

impl StoreStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
