//! Background Tasks Module
//!
//! Tasks spawned by the cache that run independently of callers.
//!
//! # Tasks
//! - Expiration: removes one entry instance when its deadline passes

mod expiration;

pub(crate) use expiration::spawn_expiration;
