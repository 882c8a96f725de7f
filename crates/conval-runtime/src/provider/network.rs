//! IP address range checks

use super::Predicate;
use conval_core::ProviderError;
use ipnet::Ipv4Net;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

/// True when the candidate address lies inside the IPv4 CIDR range.
///
/// IPv4-mapped IPv6 candidates (`::ffff:a.b.c.d`) are checked as IPv4; any
/// other IPv6 candidate is not contained. Malformed candidates and ranges are
/// errors, never `false`.
pub fn ip_in_range() -> Predicate<String, String> {
    Arc::new(|candidate: &String, range: &String| contains(candidate, range))
}

fn contains(candidate: &str, range: &str) -> Result<bool, ProviderError> {
    let address = candidate
        .trim()
        .parse::<IpAddr>()
        .map_err(|_| ProviderError::InvalidIpAddress {
            value: candidate.to_string(),
        })?;
    let network = parse_range(range)?;

    match address {
        IpAddr::V4(address) => Ok(network.contains(&address)),
        IpAddr::V6(address) => Ok(address
            .to_ipv4_mapped()
            .is_some_and(|address| network.contains(&address))),
    }
}

fn parse_range(range: &str) -> Result<Ipv4Net, ProviderError> {
    let invalid = |reason: &str| ProviderError::InvalidIpRange {
        range: range.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = range.trim().split('/').collect();
    let [address, prefix] = parts.as_slice() else {
        return Err(invalid("expected exactly one '/' separator"));
    };

    let address = address
        .parse::<Ipv4Addr>()
        .map_err(|_| invalid("address part is not a valid IPv4 address"))?;
    // u8 parsing alone would accept a leading '+'
    let prefix = Some(*prefix)
        .filter(|prefix| !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|prefix| prefix.parse::<u8>().ok())
        .filter(|prefix| *prefix <= 32)
        .ok_or_else(|| invalid("prefix length must be an integer between 0 and 32"))?;

    Ipv4Net::new(address, prefix).map_err(|err| invalid(&err.to_string()))
}
