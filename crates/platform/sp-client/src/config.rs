//! Platform client configuration.

use serde::{Deserialize, Serialize};

/// Default timeout for platform requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API. Empty means not configured.
    pub base_url: String,

    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PlatformConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Whether a base URL is set.
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    /// Join a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PlatformConfig::new("https://platform.example.com").with_timeout(5);

        assert_eq!(config.base_url, "https://platform.example.com");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.is_configured());
    }

    #[test]
    fn test_default_is_unconfigured() {
        let config = PlatformConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!PlatformConfig::new("   ").is_configured());
    }

    #[test]
    fn test_url_joining() {
        let config = PlatformConfig::new("http://localhost:8080/");
        assert_eq!(config.url("/api/login"), "http://localhost:8080/api/login");
        assert_eq!(config.url("mobile/auth"), "http://localhost:8080/mobile/auth");
    }
}
