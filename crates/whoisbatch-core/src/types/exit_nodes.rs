use std::collections::HashSet;
use std::net::IpAddr;

/// Known anonymization exit addresses (the Tor exit list)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitNodeSet {
    addrs: HashSet<IpAddr>,
}

impl ExitNodeSet {
    /// Parse the `exit-addresses` document published by the Tor project.
    ///
    /// Only `ExitAddress <ip> <date> <time>` lines are read; anything that
    /// does not parse is skipped.
    #[must_use]
    pub fn parse(document: &str) -> Self {
        let addrs = document
            .lines()
            .filter_map(|line| line.strip_prefix("ExitAddress"))
            .filter_map(|rest| rest.split_whitespace().next())
            .filter_map(|ip| ip.parse().ok())
            .collect();
        Self { addrs }
    }

    /// Returns true if `ip` is a listed exit
    #[must_use]
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.addrs.contains(ip)
    }

    /// Number of listed exits
    #[must_use]
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Returns true if nothing is listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

impl FromIterator<IpAddr> for ExitNodeSet {
    fn from_iter<I: IntoIterator<Item = IpAddr>>(iter: I) -> Self {
        Self {
            addrs: iter.into_iter().collect(),
        }
    }
}
