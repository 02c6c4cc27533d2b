use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarsened network identifier used as the lookup-cache key
/// (e.g. `8.8.8.0/24` or `2001:db8:1::/48`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    /// Wrap an already-derived block string
    #[must_use]
    pub fn new(block: impl Into<String>) -> Self {
        Self(block.into())
    }

    /// The block in CIDR notation
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ownership/geolocation observed for a network block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Organization/ISP name as it was reported
    pub organization: String,
    /// Two-letter country code
    pub country_code: Option<String>,
    /// Full country name
    pub country_name: Option<String>,
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
}
