//! URL guard for SSRF protection.

use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use ipnet::IpNet;
use tracing::{debug, warn};
use url::Url;

use crate::error::{PreviewError, PreviewResult};
use crate::traits::resolver::{HostResolver, SystemResolver};

/// Ranges no preview fetch may ever connect to.
const BLOCKED_RANGES: &[&str] = &[
    "0.0.0.0/8",      // "This" network
    "10.0.0.0/8",     // Private
    "127.0.0.0/8",    // Loopback
    "169.254.0.0/16", // Link-local / cloud metadata
    "172.16.0.0/12",  // Private
    "192.168.0.0/16", // Private
    "224.0.0.0/4",    // Multicast
    "240.0.0.0/4",    // Reserved, broadcast
    "::/128",         // IPv6 unspecified
    "::1/128",        // IPv6 loopback
    "fc00::/7",       // IPv6 unique-local
    "fe80::/10",      // IPv6 link-local
    "ff00::/8",       // IPv6 multicast
];

fn default_blocked_cidrs() -> Vec<IpNet> {
    BLOCKED_RANGES.iter().filter_map(|c| c.parse().ok()).collect()
}

/// A URL that passed the guard, with the addresses its host resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VettedTarget {
    /// The URL exactly as requested
    pub raw: String,

    /// Parsed form of `raw`
    pub url: Url,

    /// Every address the host resolved to, all of them allowed
    pub addrs: Vec<IpAddr>,
}

/// URL guard for SSRF protection.
///
/// Validates URLs before fetching to prevent:
/// - Access to internal services (localhost, 127.0.0.1)
/// - Access to private IP ranges (10.x, 172.16.x, 192.168.x, fc00::/7)
/// - Access to cloud metadata services (169.254.x)
/// - Multicast, reserved and "this network" addresses
/// - Non-HTTP(S) schemes (file://, ftp://)
///
/// Hostnames are resolved and **every** returned address is checked.
#[derive(Clone)]
pub struct UrlGuard {
    /// Allowed URL schemes
    allowed_schemes: HashSet<String>,

    /// Blocked CIDR ranges
    blocked_cidrs: Vec<IpNet>,

    /// Hosts exempt from address checks
    allowed_hosts: HashSet<String>,

    resolver: Arc<dyn HostResolver>,
}

impl fmt::Debug for UrlGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlGuard")
            .field("allowed_schemes", &self.allowed_schemes)
            .field("blocked_cidrs", &self.blocked_cidrs)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("resolver", &self.resolver.name())
            .finish()
    }
}

impl Default for UrlGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlGuard {
    /// Create a guard with default rules and the system resolver.
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(SystemResolver))
    }

    /// Create a guard with default rules and a custom resolver.
    pub fn with_resolver(resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_cidrs: default_blocked_cidrs(),
            allowed_hosts: HashSet::new(),
            resolver,
        }
    }

    /// Add an allowed host (bypasses address checks).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    /// Block an additional CIDR range.
    pub fn block_cidr(mut self, cidr: IpNet) -> Self {
        self.blocked_cidrs.push(cidr);
        self
    }

    /// Check whether an address falls in a blocked range.
    ///
    /// IPv4-mapped IPv6 addresses are judged by the IPv4 address they carry.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        let ip = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
            v4 => v4,
        };
        self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip))
    }

    fn check_addr(&self, ip: IpAddr) -> PreviewResult<()> {
        if self.is_blocked(ip) {
            return Err(PreviewError::BlockedAddress { ip });
        }
        Ok(())
    }

    fn is_allowed_host(&self, host: &str) -> bool {
        self.allowed_hosts.contains(host)
    }

    /// Parse a URL and check its scheme and host, without touching DNS.
    pub fn parse(&self, raw: &str) -> PreviewResult<Url> {
        let url = Url::parse(raw).map_err(|e| PreviewError::invalid_url(raw, e))?;

        if !self.allowed_schemes.contains(url.scheme()) {
            return Err(PreviewError::invalid_url(
                raw,
                "only http and https are supported",
            ));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(PreviewError::invalid_url(raw, "URL has no host"));
        }

        Ok(url)
    }

    /// Check a redirect target before it is followed.
    ///
    /// Hostnames are re-checked at connect time by the guarded resolver;
    /// IP literals never reach a resolver, so they are checked here.
    pub fn check_redirect(&self, url: &Url) -> PreviewResult<()> {
        if !self.allowed_schemes.contains(url.scheme()) {
            return Err(PreviewError::invalid_url(
                url.as_str(),
                "redirect to a scheme other than http or https",
            ));
        }

        let host = url.host_str().unwrap_or_default();
        if self.is_allowed_host(host) {
            return Ok(());
        }

        match url.host() {
            Some(url::Host::Ipv4(ip)) => self.check_addr(IpAddr::V4(ip)),
            Some(url::Host::Ipv6(ip)) => self.check_addr(IpAddr::V6(ip)),
            Some(url::Host::Domain(_)) => Ok(()),
            None => Err(PreviewError::invalid_url(url.as_str(), "URL has no host")),
        }
    }

    /// Resolve a host and check every address it maps to.
    ///
    /// IP-literal hosts (including bracketed IPv6) resolve to themselves.
    pub async fn resolve_checked(&self, host: &str, port: u16) -> PreviewResult<Vec<IpAddr>> {
        let bare = host.trim_start_matches('[').trim_end_matches(']');

        let addrs = match bare.parse::<IpAddr>() {
            Ok(ip) => vec![ip],
            Err(_) => self
                .resolver
                .lookup(bare, port)
                .await
                .map_err(|e| PreviewError::Resolution {
                    host: host.to_string(),
                    reason: e.to_string(),
                })?,
        };

        if addrs.is_empty() {
            return Err(PreviewError::Resolution {
                host: host.to_string(),
                reason: "no addresses returned".to_string(),
            });
        }

        if self.is_allowed_host(host) {
            return Ok(addrs);
        }

        for ip in &addrs {
            if let Err(e) = self.check_addr(*ip) {
                warn!(host = %host, ip = %ip, "Host resolved to blocked address");
                return Err(e);
            }
        }

        Ok(addrs)
    }

    /// Validate a URL end to end: parse, check scheme, resolve, check addresses.
    pub async fn vet(&self, raw: &str) -> PreviewResult<VettedTarget> {
        let url = self.parse(raw)?;
        let host = url.host_str().unwrap_or_default().to_string();
        let port = url.port_or_known_default().unwrap_or(80);

        let addrs = self.resolve_checked(&host, port).await?;
        debug!(url = %raw, host = %host, addrs = ?addrs, "Target vetted");

        Ok(VettedTarget {
            raw: raw.to_string(),
            url,
            addrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticResolver;
    use proptest::prelude::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn guard_with(host: &str, ips: &[&str]) -> UrlGuard {
        let resolver = StaticResolver::new().with_host(host, ips);
        UrlGuard::with_resolver(Arc::new(resolver))
    }

    #[test]
    fn test_default_ranges_all_parse() {
        assert_eq!(default_blocked_cidrs().len(), BLOCKED_RANGES.len());
    }

    #[test]
    fn test_blocks_loopback() {
        let guard = UrlGuard::new();
        assert!(guard.is_blocked("127.0.0.1".parse().unwrap()));
        assert!(guard.is_blocked("127.255.0.9".parse().unwrap()));
        assert!(guard.is_blocked("::1".parse().unwrap()));
    }

    #[test]
    fn test_blocks_private_ranges() {
        let guard = UrlGuard::new();
        assert!(guard.is_blocked("10.0.0.5".parse().unwrap()));
        assert!(guard.is_blocked("172.16.0.1".parse().unwrap()));
        assert!(guard.is_blocked("172.31.255.255".parse().unwrap()));
        assert!(guard.is_blocked("192.168.1.1".parse().unwrap()));
        assert!(guard.is_blocked("fd12:3456::1".parse().unwrap()));
        assert!(!guard.is_blocked("172.32.0.1".parse().unwrap()));
    }

    #[test]
    fn test_blocks_link_local_and_metadata() {
        let guard = UrlGuard::new();
        assert!(guard.is_blocked("169.254.169.254".parse().unwrap()));
        assert!(guard.is_blocked("fe80::1".parse().unwrap()));
    }

    #[test]
    fn test_blocks_multicast_reserved_and_zero() {
        let guard = UrlGuard::new();
        assert!(guard.is_blocked("224.0.0.1".parse().unwrap()));
        assert!(guard.is_blocked("239.255.255.250".parse().unwrap()));
        assert!(guard.is_blocked("240.0.0.1".parse().unwrap()));
        assert!(guard.is_blocked("255.255.255.255".parse().unwrap()));
        assert!(guard.is_blocked("0.1.2.3".parse().unwrap()));
        assert!(guard.is_blocked("ff02::1".parse().unwrap()));
        assert!(guard.is_blocked("::".parse().unwrap()));
    }

    #[test]
    fn test_blocks_ipv4_mapped() {
        let guard = UrlGuard::new();
        assert!(guard.is_blocked("::ffff:127.0.0.1".parse().unwrap()));
        assert!(guard.is_blocked("::ffff:169.254.169.254".parse().unwrap()));
        assert!(!guard.is_blocked("::ffff:93.184.216.34".parse().unwrap()));
    }

    #[test]
    fn test_allows_public_addresses() {
        let guard = UrlGuard::new();
        assert!(!guard.is_blocked("93.184.216.34".parse().unwrap()));
        assert!(!guard.is_blocked("8.8.8.8".parse().unwrap()));
        assert!(!guard.is_blocked("2606:2800:220:1:248:1893:25c8:1946".parse().unwrap()));
    }

    #[test]
    fn test_block_extra_cidr() {
        let guard = UrlGuard::new().block_cidr("100.64.0.0/10".parse().unwrap());
        assert!(guard.is_blocked("100.64.1.1".parse().unwrap()));
    }

    #[test]
    fn test_rejects_non_http() {
        let guard = UrlGuard::new();
        assert!(matches!(
            guard.parse("file:///etc/passwd"),
            Err(PreviewError::InvalidUrl { .. })
        ));
        assert!(matches!(
            guard.parse("ftp://example.com/"),
            Err(PreviewError::InvalidUrl { .. })
        ));
        assert!(matches!(
            guard.parse("not a url"),
            Err(PreviewError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_vet_rejects_hostnames_resolving_to_internal() {
        for ip in ["127.0.0.1", "10.0.0.5", "169.254.169.254"] {
            let guard = guard_with("evil.example", &[ip]);
            let err = guard.vet("http://evil.example/").await.unwrap_err();
            assert_eq!(
                err,
                PreviewError::BlockedAddress {
                    ip: ip.parse().unwrap()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_vet_checks_every_address() {
        let guard = guard_with("mixed.example", &["93.184.216.34", "10.1.2.3"]);
        let err = guard.vet("https://mixed.example/").await.unwrap_err();
        assert_eq!(
            err,
            PreviewError::BlockedAddress {
                ip: "10.1.2.3".parse().unwrap()
            }
        );
    }

    #[tokio::test]
    async fn test_vet_public_host() {
        let guard = guard_with("example.com", &["93.184.216.34"]);
        let target = guard.vet("https://example.com/page").await.unwrap();
        assert_eq!(target.raw, "https://example.com/page");
        assert_eq!(target.addrs, vec![IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))]);
    }

    #[tokio::test]
    async fn test_vet_unknown_host_is_resolution_error() {
        let guard = guard_with("example.com", &["93.184.216.34"]);
        let err = guard.vet("https://nowhere.example/").await.unwrap_err();
        assert!(matches!(err, PreviewError::Resolution { .. }));
    }

    #[tokio::test]
    async fn test_vet_ip_literals() {
        let guard = UrlGuard::new();
        assert!(matches!(
            guard.vet("http://127.0.0.1/").await,
            Err(PreviewError::BlockedAddress { .. })
        ));
        assert!(matches!(
            guard.vet("http://[::1]:8080/").await,
            Err(PreviewError::BlockedAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_allowed_hosts_bypass() {
        let guard = UrlGuard::new().allow_host("127.0.0.1");
        let target = guard.vet("http://127.0.0.1:3000/").await.unwrap();
        assert_eq!(target.addrs, vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);
    }

    #[test]
    fn test_check_redirect() {
        let guard = UrlGuard::new();
        let internal = Url::parse("http://169.254.169.254/latest/meta-data").unwrap();
        let public = Url::parse("https://example.org/next").unwrap();
        let mailto = Url::parse("mailto:someone@example.org").unwrap();

        assert!(matches!(
            guard.check_redirect(&internal),
            Err(PreviewError::BlockedAddress { .. })
        ));
        assert!(guard.check_redirect(&public).is_ok());
        assert!(guard.check_redirect(&mailto).is_err());
    }

    proptest! {
        #[test]
        fn prop_ten_slash_eight_always_blocked(b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
            let guard = UrlGuard::new();
            prop_assert!(guard.is_blocked(IpAddr::V4(Ipv4Addr::new(10, b, c, d))));
        }

        #[test]
        fn prop_reserved_and_multicast_blocked(a in 224u8..=255, b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
            let guard = UrlGuard::new();
            prop_assert!(guard.is_blocked(IpAddr::V4(Ipv4Addr::new(a, b, c, d))));
        }

        #[test]
        fn prop_mapped_matches_v4(a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
            let guard = UrlGuard::new();
            let v4 = Ipv4Addr::new(a, b, c, d);
            let mapped: Ipv6Addr = v4.to_ipv6_mapped();
            prop_assert_eq!(guard.is_blocked(IpAddr::V4(v4)), guard.is_blocked(IpAddr::V6(mapped)));
        }
    }
}
