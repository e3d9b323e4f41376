//! Preview pipeline: extraction, reference resolution and orchestration.

pub mod extract;
pub mod preview;
pub mod resolve;

pub use extract::{extract_metadata, ExtractedMetadata};
pub use preview::{BatchPhase, Previewer};
pub use resolve::{default_favicon, resolve_reference};
