//! Anonymity classification from organization names and service flags.

use std::net::IpAddr;
use whoisbatch_core::{Classification, ExitNodeSet, PrivacyFlags};

/// Apple iCloud Private Relay and similar
const PRIVATE_RELAY_KEYWORDS: &[&str] = &["icloud", "private relay"];

/// Named VPN operators and privacy-network foundations
const NAMED_VPN_KEYWORDS: &[&str] = &[
    "vpn",
    "proxy",
    "applied privacy",
    "privacy foundation",
    "calyx institute",
    "foundation for applied privacy",
];

/// Hosting, cloud and anonymizer brands
const HOSTING_KEYWORDS: &[&str] = &[
    "hosting",
    "datacenter",
    "data center",
    "vps",
    "cloud",
    "server",
    "dedi",
    "amazon technologies",
    "amazon.com",
    "google llc",
    "google cloud",
    "microsoft corporation",
    "azure",
    "oracle cloud",
    "alibaba",
    "tencent",
    "huawei",
    "digitalocean",
    "linode",
    "vultr",
    "ovh",
    "hetzner",
    "m247",
    "proweb",
    "choopa",
    "leaseweb",
    "datacamp",
    "ip-volume",
    "flyservers",
    "performive",
    "hostroyale",
    "packet exchange",
    "xtom",
    "tzulo",
    "psychz",
    "franantech",
    "buyvm",
    "melbicom",
    "pfcloud",
    "epyc",
    "layerhost",
    "akamai",
    "cloudflare",
    "fastly",
    "cdn77",
    "imperva",
    "incapsula",
    "cloudfront",
    "expressvpn",
    "nordvpn",
    "proton",
    "mullvad",
    "private internet access",
    "windscribe",
    "cyberghost",
    "torguard",
    "vyprvpn",
    "purevpn",
];

/// Hosting keywords that denote a CDN edge rather than a plain host
const CDN_KEYWORDS: &[&str] = &["cloudflare", "akamai", "fastly", "cloudfront"];

fn matches_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Classify by exit-node membership, then organization keywords.
///
/// Precedence: Tor > private relay > named VPN/proxy > hosting (CDN brands
/// become [`Classification::CdnProxy`]) > standard.
#[must_use]
pub fn classify_by_name(ip: Option<IpAddr>, organization: &str, exit_nodes: &ExitNodeSet) -> Classification {
    if ip.is_some_and(|ip| exit_nodes.contains(&ip)) {
        return Classification::TorExit;
    }

    let name = organization.to_lowercase();
    if matches_any(&name, PRIVATE_RELAY_KEYWORDS) {
        Classification::PrivateRelay
    } else if matches_any(&name, NAMED_VPN_KEYWORDS) {
        Classification::NamedVpnProxy
    } else if matches_any(&name, HOSTING_KEYWORDS) {
        if matches_any(&name, CDN_KEYWORDS) {
            Classification::CdnProxy
        } else {
            Classification::HostingDatacenter
        }
    } else {
        Classification::Standard
    }
}

/// Classify from the paid service's structured flags
#[must_use]
pub const fn classify_by_flags(flags: &PrivacyFlags) -> Classification {
    if flags.tor {
        Classification::TorExit
    } else if flags.relay {
        Classification::PrivateRelay
    } else if flags.vpn || flags.proxy {
        Classification::NamedVpnProxy
    } else if flags.hosting {
        Classification::HostingDatacenter
    } else {
        Classification::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(org: &str) -> Classification {
        classify_by_name(None, org, &ExitNodeSet::default())
    }

    #[test]
    fn test_keyword_precedence() {
        assert_eq!(classify("Comcast Cable"), Classification::Standard);
        assert_eq!(classify("Hetzner Online GmbH"), Classification::HostingDatacenter);
        assert_eq!(classify("NordVPN Hosting"), Classification::NamedVpnProxy);
        assert_eq!(classify("iCloud Private Relay VPN"), Classification::PrivateRelay);
        assert_eq!(classify("Foundation for Applied Privacy"), Classification::NamedVpnProxy);
    }

    #[test]
    fn test_cdn_brands() {
        assert_eq!(classify("Cloudflare Hosting"), Classification::CdnProxy);
        assert_eq!(classify("Akamai Technologies"), Classification::CdnProxy);
        assert_eq!(classify("Amazon.com / CloudFront"), Classification::CdnProxy);
    }

    #[test]
    fn test_tor_membership_wins() {
        let exits = ExitNodeSet::parse("ExitNode ABC\nExitAddress 185.220.101.1 2024-01-01 00:00:00\n");
        let ip: IpAddr = "185.220.101.1".parse().unwrap();
        assert_eq!(
            classify_by_name(Some(ip), "iCloud Private Relay", &exits),
            Classification::TorExit
        );
        let other: IpAddr = "185.220.101.2".parse().unwrap();
        assert_eq!(
            classify_by_name(Some(other), "Some ISP", &exits),
            Classification::Standard
        );
    }

    #[test]
    fn test_flags_precedence() {
        let mut flags = PrivacyFlags {
            vpn: true,
            hosting: true,
            ..PrivacyFlags::default()
        };
        assert_eq!(classify_by_flags(&flags), Classification::NamedVpnProxy);
        flags.tor = true;
        assert_eq!(classify_by_flags(&flags), Classification::TorExit);
        assert_eq!(classify_by_flags(&PrivacyFlags::default()), Classification::Standard);
        let hosting = PrivacyFlags {
            hosting: true,
            ..PrivacyFlags::default()
        };
        assert_eq!(classify_by_flags(&hosting), Classification::HostingDatacenter);
    }
}
