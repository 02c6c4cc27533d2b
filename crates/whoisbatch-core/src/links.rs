//! Third-party lookup pages attached to every result for manual follow-up.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A named link to an external lookup page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLink {
    /// Display name of the service
    pub name: String,
    /// Fully formed URL
    pub url: String,
}

impl ReferenceLink {
    fn new(name: &str, url: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            url: url.into(),
        }
    }
}

/// Build the reference links for a target.
///
/// IPv6 addresses get a reduced set since several services only accept IPv4.
#[must_use]
pub fn reference_links(target: &str) -> Vec<ReferenceLink> {
    let encoded = encode(target);
    let address = target.parse::<IpAddr>().ok();

    let mut links = vec![ReferenceLink::new(
        "VirusTotal",
        format!("https://www.virustotal.com/gui/search/{encoded}"),
    )];

    match address {
        Some(IpAddr::V6(_)) => {
            links.push(ReferenceLink::new(
                "DomainSearch.jp",
                format!("https://www.domainsearch.jp/whois/?q={encoded}"),
            ));
            links.push(ReferenceLink::new(
                "DNS Checker",
                format!("https://dnschecker.org/ipv6-whois-lookup.php?query={encoded}"),
            ));
            links.push(ReferenceLink::new(
                "IP2Proxy",
                format!("https://www.ip2proxy.com/{encoded}"),
            ));
            links.push(ReferenceLink::new(
                "IP Location",
                format!("https://iplocation.io/ip/{encoded}"),
            ));
        }
        Some(IpAddr::V4(_)) => {
            links.push(ReferenceLink::new(
                "Aguse",
                format!("https://www.aguse.jp/?url={encoded}"),
            ));
            links.push(ReferenceLink::new(
                "Whois.com",
                format!("https://www.whois.com/whois/{encoded}"),
            ));
            links.push(ReferenceLink::new(
                "Who.is",
                format!("https://who.is/whois-ip/ip-address/{encoded}"),
            ));
            links.push(ReferenceLink::new(
                "DNS Checker",
                format!("https://dnschecker.org/ip-whois-lookup.php?query={encoded}"),
            ));
            links.push(ReferenceLink::new(
                "IP2Proxy",
                format!("https://www.ip2proxy.com/{encoded}"),
            ));
            links.push(ReferenceLink::new(
                "IP Location",
                format!("https://iplocation.io/ip/{encoded}"),
            ));
        }
        None => {
            links.push(ReferenceLink::new(
                "Whois.com",
                format!("https://www.whois.com/whois/{encoded}"),
            ));
            links.push(ReferenceLink::new(
                "Who.is",
                format!("https://who.is/whois/{encoded}"),
            ));
            links.push(ReferenceLink::new(
                "DNS Checker",
                format!("https://dnschecker.org/whois-lookup.php?query={encoded}"),
            ));
            links.push(ReferenceLink::new("ICANN Lookup", "https://lookup.icann.org/"));
        }
    }

    links
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
