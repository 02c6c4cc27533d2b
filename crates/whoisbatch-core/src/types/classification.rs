use serde::{Deserialize, Serialize};

/// Anonymity/hosting classification of an address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Residential or business connection, nothing detected
    #[default]
    Standard,
    /// Hosting provider, cloud or datacenter range
    HostingDatacenter,
    /// Commercial VPN or proxy brand
    NamedVpnProxy,
    /// Listed Tor exit address
    TorExit,
    /// CDN edge acting as a proxy
    CdnProxy,
    /// Apple iCloud Private Relay and similar relays
    PrivateRelay,
}

impl Classification {
    /// Returns true for anything other than a standard connection
    #[must_use]
    pub const fn is_anonymizing(self) -> bool {
        !matches!(self, Self::Standard)
    }

    /// Short human label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard Connection",
            Self::HostingDatacenter => "Hosting/DataCenter",
            Self::NamedVpnProxy => "VPN/Proxy (Named)",
            Self::TorExit => "Tor Node",
            Self::CdnProxy => "CDN/Proxy",
            Self::PrivateRelay => "Private Relay",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured privacy detection flags reported by the paid service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyFlags {
    /// Known VPN exit
    #[serde(default)]
    pub vpn: bool,
    /// Open or commercial proxy
    #[serde(default)]
    pub proxy: bool,
    /// Tor exit node
    #[serde(default)]
    pub tor: bool,
    /// Anonymous relay (e.g. iCloud Private Relay)
    #[serde(default)]
    pub relay: bool,
    /// Hosting/cloud provider
    #[serde(default)]
    pub hosting: bool,
}

impl PrivacyFlags {
    /// Returns true if no flag is set
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        !(self.vpn || self.proxy || self.tor || self.relay || self.hosting)
    }
}
