//! Fetcher trait for pluggable page retrieval.
//!
//! The orchestrator only needs raw bytes for a vetted URL; how they are
//! obtained is up to the implementation:
//! - `HttpFetcher` - reqwest with redirect, size and time limits
//! - `MockFetcher` - canned pages for tests

use async_trait::async_trait;
use url::Url;

use crate::error::PreviewResult;
use crate::security::VettedTarget;

/// Raw response for a fetched page, before HTML parsing.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects
    pub final_url: Url,

    /// Body bytes, already cut at the configured ceiling
    pub body: Vec<u8>,

    /// Whether the body was cut at the ceiling
    pub truncated: bool,
}

impl FetchedPage {
    pub fn new(final_url: Url, body: impl Into<Vec<u8>>) -> Self {
        Self {
            final_url,
            body: body.into(),
            truncated: false,
        }
    }

    /// Mark the body as truncated.
    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }
}

/// Fetcher trait for retrieving a page that already passed the SSRF guard.
///
/// Implementations must fail with `PreviewError::Http` for any status other
/// than 200, and must never read more than their configured body ceiling.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch one vetted target.
    async fn fetch(&self, target: &VettedTarget) -> PreviewResult<FetchedPage>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
