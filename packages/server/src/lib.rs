// Link Preview Service - API Core
//
// Thin HTTP boundary around the link_preview crate: request framing, status
// mapping, CORS and request tracing. All extraction and SSRF logic lives in
// the library.

pub mod config;
pub mod server;

pub use config::*;
