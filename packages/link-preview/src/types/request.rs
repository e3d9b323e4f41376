//! Target requests: the wire form and the validated core form.

use serde::Deserialize;

use crate::error::{PreviewError, PreviewResult};
use crate::types::config::MAX_BATCH_SIZE;

/// Request body accepted at the boundary.
///
/// `url` is the single-URL form; `urls` the batch form. When both are
/// present they are merged with `url` first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub urls: Option<Vec<String>>,
}

impl ExtractRequest {
    /// Request for one URL.
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            urls: None,
        }
    }

    /// Request for several URLs.
    pub fn batch<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: None,
            urls: Some(urls.into_iter().map(Into::into).collect()),
        }
    }

    /// All requested URLs in order. An empty `url` field counts as absent.
    pub fn urls(&self) -> Vec<String> {
        let mut urls = Vec::new();
        if let Some(url) = self.url.as_ref().filter(|u| !u.is_empty()) {
            urls.push(url.clone());
        }
        if let Some(batch) = &self.urls {
            urls.extend(batch.iter().cloned());
        }
        urls
    }

    /// Validate and convert into a [`TargetRequest`].
    pub fn into_target(self) -> PreviewResult<TargetRequest> {
        self.into_target_capped(MAX_BATCH_SIZE)
    }

    /// Validate against a batch cap lower than the hard limit.
    pub fn into_target_capped(self, max: usize) -> PreviewResult<TargetRequest> {
        TargetRequest::from_urls_capped(self.urls(), max)
    }
}

/// A validated request: one URL, or an ordered batch of 2 to 5 URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRequest {
    Single(String),
    Batch(Vec<String>),
}

impl TargetRequest {
    /// Build from a URL list, rejecting empty and oversized lists.
    pub fn from_urls(urls: Vec<String>) -> PreviewResult<Self> {
        Self::from_urls_capped(urls, MAX_BATCH_SIZE)
    }

    /// Same as [`TargetRequest::from_urls`] with a custom cap, clamped to 5.
    pub fn from_urls_capped(mut urls: Vec<String>, max: usize) -> PreviewResult<Self> {
        let max = max.min(MAX_BATCH_SIZE);
        match urls.len() {
            0 => Err(PreviewError::InvalidBatchSize { count: 0, max }),
            n if n > max => Err(PreviewError::InvalidBatchSize { count: n, max }),
            1 => Ok(Self::Single(urls.remove(0))),
            _ => Ok(Self::Batch(urls)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
