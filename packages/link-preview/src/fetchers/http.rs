//! HTTP fetcher implementation.
//!
//! Fetches a single vetted page with reqwest under fixed limits: a request
//! timeout, a redirect cap and a body ceiling. Connections go through
//! [`GuardedDns`] so redirect hops are held to the same SSRF rules as the
//! original target.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{PreviewError, PreviewResult};
use crate::fetchers::body::read_capped;
use crate::security::{GuardedDns, UrlGuard, VettedTarget};
use crate::traits::fetcher::{FetchedPage, Fetcher};
use crate::types::config::FetchConfig;

/// HTTP fetcher backed by a shared reqwest client.
///
/// # Example
///
/// ```rust,ignore
/// use link_preview::{FetchConfig, HttpFetcher, UrlGuard};
///
/// let guard = UrlGuard::new();
/// let fetcher = HttpFetcher::new(FetchConfig::default(), guard.clone())?;
/// let target = guard.vet("https://example.com").await?;
/// let page = fetcher.fetch(&target).await?;
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a fetcher whose connections are checked by `guard`.
    pub fn new(config: FetchConfig, guard: UrlGuard) -> PreviewResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).map_err(|e| PreviewError::Fetch {
                reason: format!("invalid Accept header: {}", e),
            })?,
        );

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(redirect_policy(config.max_redirects, guard.clone()))
            .dns_resolver(Arc::new(GuardedDns::new(guard)))
            // A proxy would resolve hosts itself, out of the guard's reach.
            .no_proxy()
            .build()
            .map_err(|e| PreviewError::Fetch {
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Limits this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

/// Follow at most `max` redirects, re-checking each hop against the guard.
fn redirect_policy(max: usize, guard: UrlGuard) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            return attempt.error(PreviewError::TooManyRedirects { max });
        }
        match guard.check_redirect(attempt.url()) {
            Ok(()) => attempt.follow(),
            Err(e) => attempt.error(e),
        }
    })
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &VettedTarget) -> PreviewResult<FetchedPage> {
        debug!(url = %target.url, "HTTP fetch starting");

        let response = self
            .client
            .get(target.url.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(url = %target.url, error = %e, "HTTP request failed");
                PreviewError::from_transport(&e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(url = %target.url, status = status.as_u16(), "Non-200 response");
            return Err(PreviewError::Http {
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();

        let body = read_capped(response.bytes_stream(), self.config.max_body_bytes)
            .await
            .map_err(|e| PreviewError::from_transport(&e))?;

        if body.truncated {
            debug!(
                url = %target.url,
                limit = self.config.max_body_bytes,
                "Body truncated at ceiling"
            );
        }

        debug!(
            url = %target.url,
            final_url = %final_url,
            content_length = body.bytes.len(),
            "Page fetched successfully"
        );

        Ok(FetchedPage::new(final_url, body.bytes).with_truncated(body.truncated))
    }

    fn name(&self) -> &str {
        "http"
    }
}
