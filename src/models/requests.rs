//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Maximum allowed key and store name length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for PUT /stores/:store/:key
///
/// # Fields
/// - `value`: The payload to store
/// - `ttl`: Optional TTL in seconds (uses default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The payload to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request body against the payload size limit.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self, max_value_size: usize) -> Option<String> {
        if self.value.len() > max_value_size {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                max_value_size
            ));
        }
        None
    }
}

/// Validates a store name or key taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_name(kind: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return Some(format!("{} cannot be empty", kind));
    }
    if name.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "{} exceeds maximum length of {} bytes",
            kind, MAX_KEY_LENGTH
        ));
    }
    None
}
