//! Data types for link previews.

pub mod config;
pub mod outcome;
pub mod record;
pub mod request;

pub use config::{FetchConfig, PreviewConfig};
pub use outcome::{BatchResult, Outcome, PreviewResponse};
pub use record::MetadataRecord;
pub use request::{ExtractRequest, TargetRequest};
