//! Mock implementations for testing.
//!
//! Provides a canned-page fetcher and a table-driven resolver so the guard
//! and the orchestrator can be exercised without real DNS or network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{PreviewError, PreviewResult};
use crate::security::VettedTarget;
use crate::traits::fetcher::{FetchedPage, Fetcher};
use crate::traits::resolver::HostResolver;

#[derive(Debug, Clone)]
enum CannedResponse {
    Page(String),
    Error(PreviewError),
}

/// Mock fetcher for testing.
///
/// Responses are keyed by the requested URL. Unknown URLs fail with
/// `PreviewError::Fetch`. Per-URL delays let tests stagger completion order.
///
/// # Example
///
/// ```rust
/// use link_preview::testing::MockFetcher;
///
/// let mock = MockFetcher::new()
///     .with_page("https://example.com/", "<title>Hello</title>")
///     .with_status("https://example.com/missing", 404);
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, CannedResponse>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    fetch_calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` with status 200 for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url.into(), CannedResponse::Page(html.into()));
        self
    }

    /// Answer `url` with a non-200 status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.insert(url.into(), CannedResponse::Error(PreviewError::Http { status }));
        self
    }

    /// Fail `url` with an arbitrary error.
    pub fn with_error(self, url: impl Into<String>, error: PreviewError) -> Self {
        self.insert(url.into(), CannedResponse::Error(error));
        self
    }

    /// Delay the response for `url`.
    pub fn with_delay(self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(url.into(), delay);
        self
    }

    fn insert(&self, url: String, response: CannedResponse) {
        self.responses.write().unwrap().insert(url, response);
    }

    /// Get the number of fetches performed.
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.read().unwrap().len()
    }

    /// Get the URLs fetched, in call order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, target: &VettedTarget) -> PreviewResult<FetchedPage> {
        self.fetch_calls.write().unwrap().push(target.raw.clone());

        let delay = self.delays.read().unwrap().get(&target.raw).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.read().unwrap().get(&target.raw).cloned();
        match response {
            Some(CannedResponse::Page(html)) => Ok(FetchedPage::new(target.url.clone(), html)),
            Some(CannedResponse::Error(e)) => Err(e),
            None => Err(PreviewError::Fetch {
                reason: format!("no canned response for {}", target.raw),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Resolver that answers from a fixed host table.
///
/// Hosts missing from the table fail like an NXDOMAIN answer.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    hosts: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `host` to the given addresses. Unparseable addresses are skipped.
    pub fn with_host(mut self, host: &str, ips: &[&str]) -> Self {
        let addrs = ips.iter().filter_map(|ip| ip.parse().ok()).collect();
        self.hosts.insert(host.to_string(), addrs);
        self
    }
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn lookup(&self, host: &str, _port: u16) -> std::io::Result<Vec<IpAddr>> {
        self.hosts.get(host).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such host: {}", host),
            )
        })
    }

    fn name(&self) -> &str {
        "static"
    }
}
