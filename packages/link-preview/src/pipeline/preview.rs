//! Preview orchestration: Guard → Fetcher → Extractor per URL, batched.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{debug, info, warn};

use crate::error::{PreviewError, PreviewResult};
use crate::fetchers::HttpFetcher;
use crate::pipeline::extract::extract_metadata;
use crate::security::UrlGuard;
use crate::traits::fetcher::{FetchedPage, Fetcher};
use crate::types::config::PreviewConfig;
use crate::types::outcome::{BatchResult, Outcome, PreviewResponse};
use crate::types::record::{domain_of, MetadataRecord};
use crate::types::request::{ExtractRequest, TargetRequest};

/// Bytes sniffed for NUL when deciding whether a body is text.
const SNIFF_LEN: usize = 1024;

/// Lifecycle of a batch, logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Dispatched,
    Running(usize),
    Collecting,
    Complete,
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatched => write!(f, "dispatched"),
            Self::Running(n) => write!(f, "running({})", n),
            Self::Collecting => write!(f, "collecting"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Runs the preview pipeline for single URLs and batches.
///
/// # Example
///
/// ```rust,ignore
/// use link_preview::{Previewer, PreviewConfig, TargetRequest};
///
/// let previewer = Previewer::http(PreviewConfig::default())?;
/// let record = previewer.preview("https://example.com").await?;
/// let batch = previewer
///     .preview_batch(&["https://a.example".into(), "https://b.example".into()])
///     .await?;
/// ```
#[derive(Clone)]
pub struct Previewer {
    guard: UrlGuard,
    fetcher: Arc<dyn Fetcher>,
    max_batch_size: usize,
}

impl fmt::Debug for Previewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Previewer")
            .field("guard", &self.guard)
            .field("fetcher", &self.fetcher.name())
            .field("max_batch_size", &self.max_batch_size)
            .finish()
    }
}

impl Previewer {
    /// Create a previewer from a guard and any fetcher.
    pub fn new(guard: UrlGuard, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            guard,
            fetcher,
            max_batch_size: PreviewConfig::default().max_batch_size,
        }
    }

    /// Create a previewer that fetches over HTTP with the system resolver.
    pub fn http(config: PreviewConfig) -> PreviewResult<Self> {
        Self::http_with_guard(config, UrlGuard::new())
    }

    /// Create an HTTP previewer around a custom guard.
    pub fn http_with_guard(config: PreviewConfig, guard: UrlGuard) -> PreviewResult<Self> {
        let fetcher = HttpFetcher::new(config.fetch.clone(), guard.clone())?;
        Ok(Self::new(guard, Arc::new(fetcher)).with_max_batch_size(config.max_batch_size))
    }

    /// Set the batch size cap (never above 5).
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = PreviewConfig::default().with_max_batch_size(max).max_batch_size;
        self
    }

    /// Largest batch this previewer accepts.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Validate a wire request against this previewer's batch cap.
    pub fn target(&self, request: ExtractRequest) -> PreviewResult<TargetRequest> {
        request.into_target_capped(self.max_batch_size)
    }

    /// Answer a validated target request.
    ///
    /// A single URL returns its record or its error directly; a batch always
    /// succeeds once its size is valid, with failures confined to their slots.
    pub async fn run(&self, request: TargetRequest) -> PreviewResult<PreviewResponse> {
        match request {
            TargetRequest::Single(url) => self.preview(&url).await.map(PreviewResponse::Single),
            TargetRequest::Batch(urls) => self.preview_batch(&urls).await.map(PreviewResponse::Batch),
        }
    }

    /// Run the full pipeline for one URL.
    pub async fn preview(&self, url: &str) -> PreviewResult<MetadataRecord> {
        let started = Instant::now();

        let target = self.guard.vet(url).await?;
        let page = self.fetcher.fetch(&target).await?;
        // The parsed tree is not Send; keep it out of the future's state.
        let (extracted, duration_ms) = {
            let document = parse_document(&page)?;
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            (extract_metadata(&document, &target.url), duration_ms)
        };

        let mut record = MetadataRecord::new(url, domain_of(&target.url));
        record.title = extracted.title;
        record.description = extracted.description;
        record.images = extracted.images;
        record.site_names = extracted.site_names;
        record.favicon = extracted.favicon.unwrap_or_default();
        record.duration_ms = duration_ms;

        debug!(
            url = %url,
            duration_ms = duration_ms,
            images = record.images.len(),
            "Metadata extracted"
        );

        Ok(record)
    }

    /// Run the pipeline for 1 to 5 URLs concurrently.
    ///
    /// Each unit is tagged with its input index and placed by that tag, so
    /// `results[i]` always belongs to `urls[i]` whatever order the units
    /// finish in. A failed unit never cancels its siblings.
    pub async fn preview_batch(&self, urls: &[String]) -> PreviewResult<BatchResult> {
        let count = urls.len();
        if count == 0 || count > self.max_batch_size {
            return Err(PreviewError::InvalidBatchSize {
                count,
                max: self.max_batch_size,
            });
        }

        debug!(phase = %BatchPhase::Dispatched, count = count, "Batch dispatched");
        debug!(phase = %BatchPhase::Running(count), "Batch running");

        let mut slots: Vec<Option<Outcome>> = vec![None; count];

        let mut completions = stream::iter(urls.iter().cloned().enumerate())
            .map(|(index, url)| async move {
                let outcome = match self.preview(&url).await {
                    Ok(record) => Outcome::Success(record),
                    Err(error) => {
                        warn!(index = index, url = %url, error = %error, "Batch item failed");
                        Outcome::Failure { url, error }
                    }
                };
                (index, outcome)
            })
            .buffer_unordered(count);

        while let Some((index, outcome)) = completions.next().await {
            debug!(index = index, success = outcome.is_success(), "Batch item finished");
            slots[index] = Some(outcome);
        }

        debug!(phase = %BatchPhase::Collecting, "Batch collecting");

        let results: Vec<Outcome> = slots
            .into_iter()
            .zip(urls)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| Outcome::Failure {
                    url: url.clone(),
                    error: PreviewError::Fetch {
                        reason: "batch item produced no outcome".to_string(),
                    },
                })
            })
            .collect();

        let batch = BatchResult::new(results);

        info!(
            phase = %BatchPhase::Complete,
            total = batch.total,
            succeeded = batch.success_count(),
            "Batch complete"
        );

        Ok(batch)
    }
}

/// Parse a fetched body as HTML.
///
/// Bodies with a NUL byte near the start are binary payloads, not markup.
/// Everything else is decoded as UTF-8 (lossily, since truncation can split a
/// character) and handed to the HTML5 tree builder, which always succeeds.
fn parse_document(page: &FetchedPage) -> PreviewResult<Html> {
    let sniff = &page.body[..page.body.len().min(SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(PreviewError::Parse {
            reason: "response body is binary, not HTML".to_string(),
        });
    }

    let text = String::from_utf8_lossy(&page.body);
    Ok(Html::parse_document(&text))
}
