//! Link Preview Metadata Extraction
//!
//! Fetches untrusted, user-supplied URLs and extracts the metadata a chat app
//! or feed reader needs to render a preview card: title, description,
//! images, site name and favicon.
//!
//! # Safety
//!
//! - Every target is vetted by [`UrlGuard`] before any request is made:
//!   only http(s), and every resolved address must be outside loopback,
//!   private, link-local, multicast and reserved ranges
//! - Connections are made through [`security::GuardedDns`], so redirect hops
//!   and re-resolved hosts are held to the same rules
//! - Fetches are bounded by a timeout, a redirect cap and a body ceiling
//!
//! # Usage
//!
//! ```rust,ignore
//! use link_preview::{ExtractRequest, PreviewConfig, Previewer};
//!
//! let previewer = Previewer::http(PreviewConfig::default())?;
//!
//! // One URL: the record itself
//! let record = previewer.preview("https://example.com").await?;
//!
//! // Up to five URLs: ordered outcomes, failures isolated per slot
//! let request = ExtractRequest::batch(["https://a.example", "https://b.example"]);
//! let response = previewer.run(request.into_target()?).await?;
//! ```
//!
//! # Modules
//!
//! - [`security`] - SSRF guard and connect-time DNS checks
//! - [`traits`] - Fetcher and resolver seams
//! - [`fetchers`] - Bounded HTTP fetcher
//! - [`pipeline`] - Extraction, URL resolution and batch orchestration
//! - [`types`] - Records, outcomes, requests and configuration
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{PreviewError, PreviewResult};
pub use fetchers::HttpFetcher;
pub use pipeline::{extract_metadata, resolve_reference, BatchPhase, Previewer};
pub use security::{UrlGuard, VettedTarget};
pub use traits::{FetchedPage, Fetcher, HostResolver, SystemResolver};
pub use types::{
    BatchResult, ExtractRequest, FetchConfig, MetadataRecord, Outcome, PreviewConfig,
    PreviewResponse, TargetRequest,
};

// Re-export testing utilities
pub use testing::{MockFetcher, StaticResolver};
