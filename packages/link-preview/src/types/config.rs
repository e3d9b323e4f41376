//! Configuration types for fetching and batching.

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of redirect hops followed before failing.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default response body ceiling (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Default number of URLs accepted per batch.
pub const MAX_BATCH_SIZE: usize = 5;

/// User agent sent with every outbound request.
pub const DEFAULT_USER_AGENT: &str =
    "link-preview/0.1 (+metadata extraction bot; fetches Open Graph and Twitter Card tags)";

/// Accept header sent with every outbound request.
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Limits applied to a single outbound fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total time allowed for the request, redirects and body included
    pub timeout: Duration,

    /// Redirect hops followed before failing with `TooManyRedirects`
    pub max_redirects: usize,

    /// Bytes of body read; anything past this is dropped silently
    pub max_body_bytes: usize,

    /// User-Agent header value
    pub user_agent: String,

    /// Accept header value
    pub accept: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Create a config with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the redirect cap.
    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the body ceiling in bytes.
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Configuration for the preview orchestrator.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Fetch limits handed to the HTTP fetcher
    pub fetch: FetchConfig,

    /// Largest batch accepted
    pub max_batch_size: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl PreviewConfig {
    /// Create a config with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fetch limits.
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Set the batch size cap. Values above the hard cap of 5 are clamped.
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max.min(MAX_BATCH_SIZE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
        assert!(config.accept.starts_with("text/html"));
    }

    #[test]
    fn test_fetch_config_builder() {
        let config = FetchConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_max_redirects(2)
            .with_max_body_bytes(1024)
            .with_user_agent("TestBot/1.0");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_redirects, 2);
        assert_eq!(config.max_body_bytes, 1024);
        assert_eq!(config.user_agent, "TestBot/1.0");
    }

    #[test]
    fn test_batch_size_is_clamped() {
        assert_eq!(PreviewConfig::new().max_batch_size, 5);
        assert_eq!(PreviewConfig::new().with_max_batch_size(50).max_batch_size, 5);
        assert_eq!(PreviewConfig::new().with_max_batch_size(3).max_batch_size, 3);
    }
}
