//! TTL Stores - A partitioned in-memory cache
//!
//! Named stores of byte payloads that expire after a per-entry TTL, with an
//! optional HTTP front end.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheEntry, StoreStats};
pub use config::Config;
