//! Typed errors for the link preview library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Every variant is terminal for the URL it concerns; nothing in the
//! pipeline retries. Payloads are owned strings so the error is `Clone`,
//! which lets failures raised inside reqwest's redirect policy and DNS
//! resolver be recovered from the transport error's source chain.

use std::net::IpAddr;

use thiserror::Error;

/// Errors that can occur while previewing a URL or a batch of URLs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// URL could not be parsed, has no host, or uses a scheme other than http(s)
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Target resolved to an address in a blocked range
    #[error("access to private/internal IP addresses is not allowed: {ip}")]
    BlockedAddress { ip: IpAddr },

    /// DNS resolution failed
    #[error("failed to resolve hostname {host}: {reason}")]
    Resolution { host: String, reason: String },

    /// Redirect chain exceeded the configured cap
    #[error("too many redirects (max {max})")]
    TooManyRedirects { max: usize },

    /// Server answered with a status other than 200
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Transport-level failure (connect, TLS, timeout, body read)
    #[error("failed to fetch URL: {reason}")]
    Fetch { reason: String },

    /// Response body could not be treated as an HTML document
    #[error("failed to parse HTML: {reason}")]
    Parse { reason: String },

    /// Batch was empty or larger than allowed
    #[error("invalid batch size {count}: expected between 1 and {max} URLs")]
    InvalidBatchSize { count: usize, max: usize },
}

impl PreviewError {
    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Recover a `PreviewError` from a reqwest error.
    ///
    /// Errors raised by the redirect policy or the guarded DNS resolver are
    /// carried in the source chain and returned as-is; anything else is a
    /// transport failure.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
        while let Some(e) = source {
            if let Some(preview) = e.downcast_ref::<PreviewError>() {
                return preview.clone();
            }
            source = e.source();
        }

        if err.is_timeout() {
            return Self::Fetch {
                reason: "request timed out".to_string(),
            };
        }

        Self::Fetch {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for preview operations.
pub type PreviewResult<T> = std::result::Result<T, PreviewError>;
