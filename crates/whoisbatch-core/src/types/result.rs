use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Classification, PrivacyFlags};
use crate::links::ReferenceLink;

/// Where a successful result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessSource {
    /// Live call to the free service for an IPv4 address
    LiveIpv4,
    /// Live call to the free service for an IPv6 address
    LiveIpv6,
    /// Served from the network-block cache
    Cache,
    /// Live call to the paid service
    Paid,
    /// Hostname target, informational only
    Domain,
    /// Simple mode, no lookup performed
    Simple,
}

/// Category of a definitive failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Connection or transport error
    Network,
    /// Request exceeded its timeout
    Timeout,
    /// Body could not be parsed or had an unknown shape
    Malformed,
    /// Service answered with an explicit `fail` status
    ServiceRejected,
    /// Credential rejected
    Unauthorized,
    /// Unexpected HTTP status
    Http(u16),
    /// Bug or misconfiguration on our side
    Internal,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Timeout => write!(f, "timeout"),
            Self::Malformed => write!(f, "malformed response"),
            Self::ServiceRejected => write!(f, "rejected by service"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Http(code) => write!(f, "HTTP {code}"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Outcome of one resolution attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Lookup succeeded
    Success {
        /// Where the data came from
        source: SuccessSource,
    },
    /// Service signalled "too many requests"; the target may be retried
    /// once `resume_at` has passed
    RateLimited {
        /// Earliest time another attempt is allowed
        resume_at: DateTime<Utc>,
    },
    /// Attempt failed and will not be retried
    Failed {
        /// Error category
        reason: FailureReason,
        /// Detail for display
        message: String,
    },
}

impl Outcome {
    /// Success or definitive failure
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::RateLimited { .. })
    }

    /// Returns true for any success source
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Resume time, present only on rate-limited outcomes
    #[must_use]
    pub const fn resume_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::RateLimited { resume_at } => Some(*resume_at),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success { source } => {
                let label = match source {
                    SuccessSource::LiveIpv4 => "IPv4 API",
                    SuccessSource::LiveIpv6 => "IPv6 API",
                    SuccessSource::Cache => "Cache",
                    SuccessSource::Paid => "Pro API",
                    SuccessSource::Domain => "Domain",
                    SuccessSource::Simple => "Simple",
                };
                write!(f, "Success ({label})")
            }
            Self::RateLimited { .. } => write!(f, "Rate Limited (429)"),
            Self::Failed { reason, message } => write!(f, "Error: {reason} ({message})"),
        }
    }
}

/// Ownership, geolocation and classification for exactly one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Target identity (raw string as submitted)
    pub target: String,

    /// Organization/ISP name, possibly with an RDAP suffix
    pub organization: Option<String>,

    /// Two-letter country code
    pub country_code: Option<String>,

    /// Full country name
    pub country_name: Option<String>,

    /// Anonymity classification
    pub classification: Classification,

    /// Structured flags when the paid service reported them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacyFlags>,

    /// Attempt outcome
    #[serde(flatten)]
    pub outcome: Outcome,

    /// Third-party lookup pages for manual follow-up
    #[serde(default)]
    pub links: Vec<ReferenceLink>,
}

impl ResolutionResult {
    /// An empty record for `target` with the given outcome
    #[must_use]
    pub fn new(target: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            target: target.into(),
            organization: None,
            country_code: None,
            country_name: None,
            classification: Classification::Standard,
            privacy: None,
            outcome,
            links: Vec::new(),
        }
    }

    /// A rate-limited record
    #[must_use]
    pub fn rate_limited(target: impl Into<String>, resume_at: DateTime<Utc>) -> Self {
        Self::new(target, Outcome::RateLimited { resume_at })
    }

    /// A definitive-failure record
    #[must_use]
    pub fn failed(target: impl Into<String>, reason: FailureReason, message: impl Into<String>) -> Self {
        Self::new(
            target,
            Outcome::Failed {
                reason,
                message: message.into(),
            },
        )
    }

    /// Attach reference links
    #[must_use]
    pub fn with_links(mut self, links: Vec<ReferenceLink>) -> Self {
        self.links = links;
        self
    }

    /// Success or definitive failure
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }
}
