//! Scan target resolution: host strings to IP addresses, URLs to parsed targets.

use std::net::IpAddr;
use std::time::Duration;

use super::error::{ScanError, ScanResult};
use crate::feature::http::parse_http_url;

/// Longest valid DNS name, excluding a trailing dot.
const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostKind {
    Ip(IpAddr),
    Domain(String),
}

/// A validated host, ready to be resolved into connectable addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    host: String,
    kind: HostKind,
}

impl ScanTarget {
    /// Validate a host string.
    ///
    /// Accepts IPv4/IPv6 literals (IPv6 optionally in brackets) and RFC 1123
    /// hostnames. Anything else is `ScanError::InvalidHost`.
    pub fn parse(host: &str) -> ScanResult<Self> {
        let trimmed = host.trim();
        let invalid = |reason: &str| ScanError::InvalidHost {
            host: host.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("empty host"));
        }

        let literal = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);
        if let Ok(ip) = literal.parse::<IpAddr>() {
            return Ok(Self {
                host: trimmed.to_string(),
                kind: HostKind::Ip(ip),
            });
        }

        let domain = match url::Host::parse(trimmed) {
            Ok(url::Host::Domain(domain)) => domain,
            Ok(url::Host::Ipv4(ip)) => {
                return Ok(Self {
                    host: trimmed.to_string(),
                    kind: HostKind::Ip(IpAddr::V4(ip)),
                })
            }
            Ok(url::Host::Ipv6(ip)) => {
                return Ok(Self {
                    host: trimmed.to_string(),
                    kind: HostKind::Ip(IpAddr::V6(ip)),
                })
            }
            Err(e) => return Err(invalid(&e.to_string())),
        };

        validate_hostname(&domain).map_err(|reason| invalid(&reason))?;

        Ok(Self {
            host: trimmed.to_string(),
            kind: HostKind::Domain(domain),
        })
    }

    /// The host as given by the caller (trimmed).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ip(&self) -> Option<IpAddr> {
        match self.kind {
            HostKind::Ip(ip) => Some(ip),
            HostKind::Domain(_) => None,
        }
    }

    /// Resolve to IP addresses, bounded by `timeout`.
    ///
    /// Resolution failures and timeouts yield an empty list; an unresolvable
    /// host is unreachable, not an error.
    pub async fn resolve(&self, timeout: Duration) -> Vec<IpAddr> {
        let domain = match &self.kind {
            HostKind::Ip(ip) => return vec![*ip],
            HostKind::Domain(domain) => domain,
        };

        match tokio::time::timeout(timeout, tokio::net::lookup_host((domain.as_str(), 0))).await {
            Ok(Ok(addrs)) => {
                let mut ips: Vec<IpAddr> = Vec::new();
                for addr in addrs {
                    if !ips.contains(&addr.ip()) {
                        ips.push(addr.ip());
                    }
                }
                ips
            }
            Ok(Err(e)) => {
                tracing::debug!(host = %self.host, error = %e, "DNS resolution failed");
                Vec::new()
            }
            Err(_) => {
                tracing::debug!(host = %self.host, ?timeout, "DNS resolution timed out");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.host)
    }
}

/// Parse a vulnerability-scan target URL. Trailing slashes are dropped so
/// probe paths can be appended uniformly.
pub fn parse_target_url(target: &str) -> ScanResult<url::Url> {
    let mut url = parse_http_url(target).map_err(|e| ScanError::InvalidUrl {
        url: target.to_string(),
        reason: e.to_string(),
    })?;
    let trimmed = url.path().trim_end_matches('/').to_string();
    url.set_path(&trimmed);
    url.set_fragment(None);
    Ok(url)
}

fn validate_hostname(domain: &str) -> Result<(), String> {
    let name = domain.strip_suffix('.').unwrap_or(domain);
    if name.len() > MAX_HOSTNAME_LEN {
        return Err(format!("longer than {} characters", MAX_HOSTNAME_LEN));
    }
    for label in name.split('.') {
        if label.is_empty() {
            return Err("empty label".to_string());
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(format!("label '{}' longer than {} characters", label, MAX_LABEL_LEN));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label '{}' starts or ends with '-'", label));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(format!("label '{}' has invalid characters", label));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ip_literals() {
        let v4 = ScanTarget::parse("127.0.0.1").unwrap();
        assert_eq!(v4.ip(), Some("127.0.0.1".parse().unwrap()));
        assert_eq!(v4.host(), "127.0.0.1");

        let v6 = ScanTarget::parse("::1").unwrap();
        assert_eq!(v6.ip(), Some("::1".parse().unwrap()));

        let bracketed = ScanTarget::parse("[::1]").unwrap();
        assert_eq!(bracketed.ip(), Some("::1".parse().unwrap()));
    }

    #[test]
    fn parses_hostnames() {
        for host in ["localhost", "example.com", "sub-domain.example.co.uk", "example.com."] {
            let target = ScanTarget::parse(host).unwrap();
            assert!(target.ip().is_none(), "{host} should be a domain");
        }
    }

    #[test]
    fn rejects_malformed_hosts() {
        for host in [
            "",
            "   ",
            "http://example.com",
            "example.com/path",
            "bad host",
            "a..b",
            "-leading.example.com",
            "999.1.1.1",
            "host:80",
        ] {
            assert!(
                matches!(ScanTarget::parse(host), Err(ScanError::InvalidHost { .. })),
                "{host:?} should be rejected"
            );
        }
        let long_label = format!("{}.com", "a".repeat(64));
        assert!(ScanTarget::parse(&long_label).is_err());
    }

    #[tokio::test]
    async fn resolves_ip_without_dns() {
        let target = ScanTarget::parse("10.1.2.3").unwrap();
        let ips = target.resolve(Duration::from_millis(10)).await;
        assert_eq!(ips, vec!["10.1.2.3".parse::<IpAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn resolves_localhost() {
        let target = ScanTarget::parse("localhost").unwrap();
        let ips = target.resolve(Duration::from_secs(2)).await;
        assert!(ips.iter().all(|ip| ip.is_loopback()));
    }

    #[tokio::test]
    async fn unresolvable_host_is_empty_not_error() {
        let target = ScanTarget::parse("no-such-host.invalid").unwrap();
        let ips = target.resolve(Duration::from_secs(2)).await;
        assert!(ips.is_empty());
    }

    #[test]
    fn target_url_normalizes_trailing_slash() {
        let url = parse_target_url("http://127.0.0.1:8080/app/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/app");
        assert!(matches!(
            parse_target_url("gopher://x"),
            Err(ScanError::InvalidUrl { .. })
        ));
    }
}
