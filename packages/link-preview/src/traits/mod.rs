//! Core trait abstractions for link previews.

pub mod fetcher;
pub mod resolver;

pub use fetcher::{FetchedPage, Fetcher};
pub use resolver::{HostResolver, SystemResolver};
