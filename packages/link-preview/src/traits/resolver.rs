//! Host resolution seam used by the SSRF guard.

use async_trait::async_trait;
use std::net::IpAddr;

/// Resolves a hostname to every address it maps to.
///
/// The guard checks all returned addresses, not just the first, so
/// implementations must not truncate the answer.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Look up all addresses for `host`. `port` is passed through to
    /// resolvers that need a socket address and is otherwise ignored.
    async fn lookup(&self, host: &str, port: u16) -> std::io::Result<Vec<IpAddr>>;

    /// Get the resolver name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Resolver backed by the system resolver via tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn lookup(&self, host: &str, port: u16) -> std::io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, port)).await?;
        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        Ok(ips)
    }

    fn name(&self) -> &str {
        "system"
    }
}
