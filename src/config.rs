//! Configuration Module
//!
//! Handles loading server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL in seconds for writes that do not specify one
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Largest accepted payload in bytes
    pub max_value_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_VALUE_SIZE` - Maximum payload size in bytes (default: 1 MiB)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            max_value_size: env_or("MAX_VALUE_SIZE", defaults.max_value_size),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            server_port: 3000,
            max_value_size: 1024 * 1024,
        }
    }
}

/// Parses `name` from the environment, falling back to `default` when unset
/// or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.max_value_size, 1024 * 1024);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("DEFAULT_TTL");
        env::remove_var("SERVER_PORT");
        env::remove_var("MAX_VALUE_SIZE");

        assert_eq!(Config::from_env(), Config::default());
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("TTL_STORES_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("TTL_STORES_TEST_GARBAGE", 7u64), 7);

        env::set_var("TTL_STORES_TEST_GARBAGE", "42");
        assert_eq!(env_or("TTL_STORES_TEST_GARBAGE", 7u64), 42);
        env::remove_var("TTL_STORES_TEST_GARBAGE");
    }
}
