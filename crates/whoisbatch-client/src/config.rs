//! Client configuration types.

/// Free geolocation service
pub const DEFAULT_FREE_URL: &str = "http://ip-api.com";

/// Paid lookup service
pub const DEFAULT_PAID_URL: &str = "https://ipinfo.io";

/// RDAP bootstrap server; redirects to the authoritative RIR
pub const DEFAULT_RDAP_URL: &str = "https://rdap.apnic.net";

/// Published Tor exit addresses
pub const DEFAULT_EXIT_LIST_URL: &str = "https://check.torproject.org/exit-addresses";

/// Base URLs of the external services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Free service, queried as `{free}/json/{ip}`
    pub free: String,

    /// Paid service, queried as `{paid}/{ip}?token=...`
    pub paid: String,

    /// RDAP server, queried as `{rdap}/ip/{ip}`
    pub rdap: String,

    /// Full URL of the exit-address document
    pub exit_list: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            free: DEFAULT_FREE_URL.to_string(),
            paid: DEFAULT_PAID_URL.to_string(),
            rdap: DEFAULT_RDAP_URL.to_string(),
            exit_list: DEFAULT_EXIT_LIST_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every service at one host (mock servers in tests)
    #[must_use]
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            free: base.to_string(),
            paid: base.to_string(),
            rdap: base.to_string(),
            exit_list: format!("{base}/exit-addresses"),
        }
    }
}
