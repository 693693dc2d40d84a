//! Cache Module
//!
//! Partitioned in-memory cache: named stores of byte payloads that expire
//! after a per-entry TTL.

mod entry;
mod list;
mod partitioned;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use partitioned::Cache;
pub use stats::StoreStats;
pub(crate) use store::CacheStore;

pub(crate) use entry::EntryId;
