//! DNS resolver for reqwest that only hands out guard-approved addresses.
//!
//! The guard vets a target before the request is built, but reqwest would
//! normally resolve the host again when it connects, and again for every
//! redirect hop. Plugging this resolver into the client means the connector
//! only ever sees addresses that passed the blocklist at connect time.

use std::error::Error as StdError;
use std::net::SocketAddr;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use tracing::debug;

use crate::security::guard::UrlGuard;

/// reqwest resolver that applies [`UrlGuard`] to every lookup.
#[derive(Debug, Clone)]
pub struct GuardedDns {
    guard: UrlGuard,
}

impl GuardedDns {
    pub fn new(guard: UrlGuard) -> Self {
        Self { guard }
    }
}

impl Resolve for GuardedDns {
    fn resolve(&self, name: Name) -> Resolving {
        let guard = self.guard.clone();
        Box::pin(async move {
            let host = name.as_str();
            // Port 0 lets the connector substitute the port from the URL.
            let ips = guard
                .resolve_checked(host, 0)
                .await
                .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

            debug!(host = %host, addrs = ?ips, "Connect-time resolution passed guard");

            let addrs: Addrs = Box::new(ips.into_iter().map(|ip| SocketAddr::new(ip, 0)));
            Ok(addrs)
        })
    }
}
