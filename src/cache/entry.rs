//! Cache Entry Module
//!
//! Defines the node stored in a store's list and the read-only view handed
//! out by lookups.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

// == Entry Id ==
/// Identifies one entry instance inside a store's arena.
///
/// The generation changes every time a slot is (re)armed, so a timer holding
/// an old id can never address a refreshed or replacing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

// == Expiry ==
/// Absolute expiration of an entry, on both clocks it is needed on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Expiry {
    /// Monotonic deadline the expiration timer sleeps until
    pub deadline: Instant,
    /// Wall-clock timestamp reported to callers
    pub expires_at: DateTime<Utc>,
}

impl Expiry {
    /// Computes the expiry for a TTL starting now.
    ///
    /// Saturates instead of panicking when the TTL overflows either clock.
    pub fn after(ttl: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + FAR_FUTURE);
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            deadline,
            expires_at,
        }
    }
}

// == Node ==
/// One live entry, linked into its store's list by arena index.
#[derive(Debug)]
pub(crate) struct Node {
    pub key: String,
    pub data: Bytes,
    pub expiry: Expiry,
    pub generation: u64,
    /// Cancels the pending expiration timer for this generation
    pub token: CancellationToken,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl Node {
    pub fn new(
        key: String,
        data: Bytes,
        expiry: Expiry,
        generation: u64,
        token: CancellationToken,
    ) -> Self {
        Self {
            key,
            data,
            expiry,
            generation,
            token,
            previous: None,
            next: None,
        }
    }

    /// Builds the read-only view returned by lookups.
    pub fn snapshot(&self) -> CacheEntry {
        CacheEntry {
            key: self.key.clone(),
            data: self.data.clone(),
            expires_at: self.expiry.expires_at,
        }
    }
}

// == Cache Entry ==
/// A cached value as returned by [`Cache::get`](crate::cache::Cache::get).
///
/// The payload shares its buffer with the store; it is only readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    key: String,
    data: Bytes,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// The key this entry was stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored payload.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// The instant after which the entry is eligible for removal.
    pub fn expiration(&self) -> DateTime<Utc> {
        self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or zero once the deadline has passed.
    ///
    /// An entry may still be returned by a lookup shortly after its deadline,
    /// until its expiration timer has run.
    pub fn ttl_remaining(&self) -> Duration {
        (self.expires_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}
