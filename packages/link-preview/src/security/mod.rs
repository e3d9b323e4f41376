//! SSRF protection: target vetting and connect-time address checks.

pub mod dns;
pub mod guard;

pub use dns::GuardedDns;
pub use guard::{UrlGuard, VettedTarget};
