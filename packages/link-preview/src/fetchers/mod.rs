//! Fetcher implementations.

pub mod body;
pub mod http;

pub use body::{read_capped, CappedBody};
pub use http::HttpFetcher;
