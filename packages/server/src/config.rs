use anyhow::{Context, Result};
use dotenvy::dotenv;
use link_preview::{FetchConfig, PreviewConfig};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub allowed_origin: String,
    pub fetch_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            port: 8080,
            allowed_origin: "*".to_string(),
            fetch_timeout_secs: fetch.timeout.as_secs(),
            max_body_bytes: fetch.max_body_bytes,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("PORT must be a valid number")?,
            allowed_origin: env::var("ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.is_empty())
                .unwrap_or(defaults.allowed_origin),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.fetch_timeout_secs.to_string())
                .parse()
                .context("FETCH_TIMEOUT_SECS must be a valid number")?,
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| defaults.max_body_bytes.to_string())
                .parse()
                .context("MAX_BODY_BYTES must be a valid number")?,
        })
    }

    /// Preview limits derived from this configuration
    pub fn preview_config(&self) -> PreviewConfig {
        let fetch = FetchConfig::default()
            .with_timeout(Duration::from_secs(self.fetch_timeout_secs))
            .with_max_body_bytes(self.max_body_bytes);
        PreviewConfig::default().with_fetch(fetch)
    }
}
