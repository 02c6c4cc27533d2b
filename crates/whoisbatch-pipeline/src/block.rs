//! Network-block key derivation.
//!
//! Nearby addresses almost always share an owner, so lookups are cached per
//! block rather than per address.

use ipnetwork::{Ipv4Network, Ipv6Network};
use std::net::IpAddr;
use whoisbatch_core::{BlockKey, Target};

/// Prefix length used to group IPv4 addresses
pub const IPV4_BLOCK_PREFIX: u8 = 24;

/// Prefix length used to group IPv6 addresses
pub const IPV6_BLOCK_PREFIX: u8 = 48;

/// Block key of an address target; `None` for hostnames
#[must_use]
pub fn block_key(target: &Target) -> Option<BlockKey> {
    target.address().and_then(block_key_for)
}

/// Block key of an address, e.g. `8.8.8.0/24` or `2001:db8:1::/48`
#[must_use]
pub fn block_key_for(ip: IpAddr) -> Option<BlockKey> {
    let block = match ip {
        IpAddr::V4(v4) => {
            let net = Ipv4Network::new(v4, IPV4_BLOCK_PREFIX).ok()?;
            format!("{}/{}", net.network(), IPV4_BLOCK_PREFIX)
        }
        IpAddr::V6(v6) => {
            let net = Ipv6Network::new(v6, IPV6_BLOCK_PREFIX).ok()?;
            format!("{}/{}", net.network(), IPV6_BLOCK_PREFIX)
        }
    };
    Some(BlockKey::new(block))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Option<String> {
        block_key(&Target::new(s)).map(|k| k.as_str().to_string())
    }

    #[test]
    fn test_ipv4_blocks() {
        assert_eq!(key("8.8.8.8").as_deref(), Some("8.8.8.0/24"));
        assert_eq!(key("8.8.4.4").as_deref(), Some("8.8.4.0/24"));
        assert_eq!(key("8.8.8.8"), key("8.8.8.200"));
    }

    #[test]
    fn test_ipv6_blocks() {
        assert_eq!(key("2001:db8:1:2::1").as_deref(), Some("2001:db8:1::/48"));
        assert_eq!(key("2001:db8:1:ffff::9"), key("2001:db8:1::1"));
        assert_ne!(key("2001:db8:1::1"), key("2001:db8:2::1"));
    }

    #[test]
    fn test_hostnames_have_no_block() {
        assert_eq!(key("example.com"), None);
        assert_eq!(key("not-an-ip"), None);
    }
}
