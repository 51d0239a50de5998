//! Address parsing and overlap tests.
//!
//! An address expression is either a single address (`10.0.0.5`) or a CIDR
//! range (`10.0.0.0/24`). Ranges may carry host bits (`10.0.0.5/24`); they
//! are truncated to their network. A range may also give its mask in dotted
//! form (`10.0.0.0/255.255.255.0`).

use anyhow::{anyhow, Result};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tracing::debug;

/// Which address fields take part in a rule overlap test.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapMode {
    /// Compare sources only; destinations are accepted and ignored.
    #[default]
    SourceOnly,
    /// Sources and destinations must both overlap.
    SourceAndDestination,
}

/// Parse an address expression into a network.
///
/// A single address becomes a /32 (IPv4) or /128 (IPv6) network.
///
/// # Examples
/// ```
/// use aclgate::address::parse_address;
/// assert_eq!(parse_address("10.0.0.5").unwrap().to_string(), "10.0.0.5/32");
/// assert_eq!(parse_address("10.0.0.5/24").unwrap().to_string(), "10.0.0.0/24");
/// assert_eq!(
///     parse_address("10.0.0.0/255.255.255.0").unwrap().to_string(),
///     "10.0.0.0/24"
/// );
/// assert!(parse_address("any").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<IpNet> {
    if let Some((addr, mask)) = text.split_once('/') {
        text.parse::<IpNet>()
            .ok()
            .or_else(|| with_netmask(addr, mask))
            .map(|net| net.trunc())
            .ok_or_else(|| anyhow!("Invalid CIDR: {}", text))
    } else {
        let ip: IpAddr = text
            .parse()
            .map_err(|_| anyhow!("Invalid IP address: {}", text))?;
        Ok(IpNet::from(ip))
    }
}

/// Build a network from an address and a dotted netmask of the same family.
/// Non-contiguous masks are rejected.
fn with_netmask(addr: &str, mask: &str) -> Option<IpNet> {
    match (addr.parse::<IpAddr>().ok()?, mask.parse::<IpAddr>().ok()?) {
        (IpAddr::V4(a), IpAddr::V4(m)) => Ipv4Net::with_netmask(a, m).ok().map(IpNet::V4),
        (IpAddr::V6(a), IpAddr::V6(m)) => Ipv6Net::with_netmask(a, m).ok().map(IpNet::V6),
        _ => None,
    }
}

/// Check whether two networks share at least one address.
///
/// Prefix networks are either nested or disjoint, so intersection reduces to
/// containment in one direction.
pub fn nets_overlap(a: &IpNet, b: &IpNet) -> bool {
    match (a, b) {
        (IpNet::V4(x), IpNet::V4(y)) => x.contains(y) || y.contains(x),
        (IpNet::V6(x), IpNet::V6(y)) => x.contains(y) || y.contains(x),
        _ => false,
    }
}

/// Check whether two address expressions overlap.
///
/// Malformed or absent text never overlaps anything.
///
/// # Examples
/// ```
/// use aclgate::address::addresses_overlap;
/// assert!(addresses_overlap(Some("10.0.0.0/24"), Some("10.0.0.5")));
/// assert!(!addresses_overlap(Some("10.0.0.1"), Some("10.0.0.2")));
/// assert!(!addresses_overlap(Some("garbage"), Some("10.0.0.2")));
/// ```
pub fn addresses_overlap(a: Option<&str>, b: Option<&str>) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };

    match (parse_address(a), parse_address(b)) {
        (Ok(x), Ok(y)) => nets_overlap(&x, &y),
        (Err(e), _) | (_, Err(e)) => {
            debug!("Address comparison skipped: {}", e);
            false
        }
    }
}

/// Overlap test between two rules' address fields.
pub fn check_overlap(
    mode: OverlapMode,
    source1: Option<&str>,
    dest1: Option<&str>,
    source2: Option<&str>,
    dest2: Option<&str>,
) -> bool {
    match mode {
        OverlapMode::SourceOnly => addresses_overlap(source1, source2),
        OverlapMode::SourceAndDestination => {
            addresses_overlap(source1, source2) && addresses_overlap(dest1, dest2)
        }
    }
}
