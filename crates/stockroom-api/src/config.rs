//! # API Configuration
//!
//! Connection settings for the REST boundary.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOCKROOM_*`)
//! 2. Defaults (this file)
//!
//! The base path varies by environment (dev proxy, staging, production),
//! so it is never hardcoded at call sites.

use std::time::Duration;

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "STOCKROOM_API_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const ENV_API_TIMEOUT_SECS: &str = "STOCKROOM_API_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// REST boundary configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, without trailing slash.
    pub base_url: String,

    /// Per-request timeout. Uploads are exempt (they can legitimately
    /// run long and carry their own cancellation token).
    pub timeout: Duration,
}

impl ApiConfig {
    /// Creates a config with the given base URL and default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        ApiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Loads configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = std::env::var(ENV_API_TIMEOUT_SECS)
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        ApiConfig {
            timeout: Duration::from_secs(timeout_secs),
            ..ApiConfig::new(base_url)
        }
    }

    /// Joins a contract path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig::new(DEFAULT_API_URL)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ApiConfig::new("https://example.com/api/");
        assert_eq!(config.base_url, "https://example.com/api");
        assert_eq!(config.endpoint("/inventory/"), "https://example.com/api/inventory/");
    }

    #[test]
    fn test_endpoint_join() {
        let config = ApiConfig::new("https://example.com/api");
        assert_eq!(
            config.endpoint("reservations/item/3"),
            "https://example.com/api/reservations/item/3"
        );
    }
}
