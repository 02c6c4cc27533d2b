use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A single lookup target as submitted by the caller.
///
/// Identity is the raw string; the normalized variant is what gets looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    raw: String,
    normalized: String,
}

/// What kind of target a string turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// An IPv4 or IPv6 address
    Address(IpAddr),
    /// Anything that does not parse as an address
    Hostname,
}

impl Target {
    /// Create a target from user input
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        Self { raw, normalized }
    }

    /// The string exactly as submitted
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed form with IPv6 brackets removed
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Classify the normalized string
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        self.normalized
            .parse::<IpAddr>()
            .map_or(TargetKind::Hostname, TargetKind::Address)
    }

    /// The parsed address, if this target is one
    #[must_use]
    pub fn address(&self) -> Option<IpAddr> {
        match self.kind() {
            TargetKind::Address(ip) => Some(ip),
            TargetKind::Hostname => None,
        }
    }

    /// Returns true for IPv4/IPv6 targets
    #[must_use]
    pub fn is_address(&self) -> bool {
        self.address().is_some()
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Target {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed)
        .to_string()
}
