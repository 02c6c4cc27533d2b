//! Run configuration for the resolution pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PipelineError, PipelineResult};
use crate::resolver::ResolverConfig;
use crate::scheduler::SchedulerConfig;

/// Tunables for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum concurrent lookups (default: 1).
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Pause before each live free-service call, in milliseconds (default: 2500).
    #[serde(default = "default_politeness_delay")]
    pub politeness_delay_ms: u64,

    /// How long a rate-limited target waits before its next attempt (default: 120).
    #[serde(default = "default_rate_limit_backoff")]
    pub rate_limit_backoff_secs: u64,

    /// Append registry network names to organizations.
    #[serde(default)]
    pub use_rdap: bool,

    /// Longest single wait while nothing is runnable (default: 5000).
    #[serde(default = "default_idle_slice")]
    pub idle_slice_ms: u64,

    /// Progress publication interval while a round runs (default: 100).
    #[serde(default = "default_poll_slice")]
    pub poll_slice_ms: u64,

    /// Skip lookups and emit reference links only.
    #[serde(default)]
    pub simple_mode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            politeness_delay_ms: default_politeness_delay(),
            rate_limit_backoff_secs: default_rate_limit_backoff(),
            use_rdap: false,
            idle_slice_ms: default_idle_slice(),
            poll_slice_ms: default_poll_slice(),
            simple_mode: false,
        }
    }
}

impl PipelineConfig {
    /// Overwrite the pacing fields with a named preset
    pub fn apply_preset(&mut self, preset: Preset) {
        match preset {
            Preset::Stable => {
                self.workers = 1;
                self.politeness_delay_ms = 2500;
            }
            Preset::Fast => {
                self.workers = 2;
                self.politeness_delay_ms = 1400;
            }
        }
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> PipelineResult<()> {
        if self.workers == 0 {
            return Err(PipelineError::InvalidConfig(
                "workers must be at least 1".into(),
            ));
        }
        if self.idle_slice_ms == 0 || self.poll_slice_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "idle and poll slices must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Settings consumed by the single-target resolver
    #[must_use]
    pub const fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            politeness_delay: Duration::from_millis(self.politeness_delay_ms),
            rate_limit_backoff: Duration::from_secs(self.rate_limit_backoff_secs),
            use_rdap: self.use_rdap,
        }
    }

    /// Settings consumed by the scheduler
    #[must_use]
    pub const fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            workers: self.workers,
            idle_slice: Duration::from_millis(self.idle_slice_ms),
            poll_slice: Duration::from_millis(self.poll_slice_ms),
            simple_mode: self.simple_mode,
        }
    }
}

/// Named pacing presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// One worker, 2.5s between calls
    Stable,
    /// Two workers, 1.4s between calls
    Fast,
}

impl FromStr for Preset {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "fast" => Ok(Self::Fast),
            other => Err(PipelineError::InvalidConfig(format!(
                "unknown preset '{other}' (expected stable or fast)"
            ))),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

const fn default_workers() -> usize {
    1
}

const fn default_politeness_delay() -> u64 {
    2500
}

const fn default_rate_limit_backoff() -> u64 {
    120
}

const fn default_idle_slice() -> u64 {
    5000
}

const fn default_poll_slice() -> u64 {
    100
}
