//! Live progress counters derived from scheduler state.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Scheduler life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Rounds are being dispatched
    Running,
    /// Cancelled; waiting for in-flight work
    Draining,
    /// No further work will be dispatched
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Draining => write!(f, "draining"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Point-in-time view of a run.
///
/// `processed` and `total` count address targets only. Hostnames finish
/// instantly and would skew the rate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Current scheduler state
    pub state: RunState,
    /// Finished address targets
    pub processed: usize,
    /// All address targets in the batch
    pub total: usize,
    /// Targets waiting out a rate limit
    pub pending: usize,
    /// Finished targets of any kind
    pub finished: usize,
    /// Distinct targets of any kind
    pub targets: usize,
    /// Blocks held by the lookup cache
    pub cache_entries: usize,
    /// Time since the run started
    pub elapsed: Duration,
    /// Estimated time remaining; `None` while still calculating
    pub eta: Option<Duration>,
    /// Time until the earliest deferred target becomes eligible
    pub next_retry_in: Option<Duration>,
}

impl Progress {
    /// Completion percentage over address targets
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.processed as f64 / self.total as f64;
        ratio * 100.0
    }

    /// Returns true once the scheduler reached `Done`
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == RunState::Done
    }
}

/// `(total - processed) / (processed / elapsed)`, or `None` before the
/// first address target finishes
#[must_use]
pub fn estimate_remaining(processed: usize, total: usize, elapsed: Duration) -> Option<Duration> {
    if processed == 0 {
        return None;
    }
    let remaining = total.saturating_sub(processed);
    #[allow(clippy::cast_precision_loss)]
    let secs = remaining as f64 * elapsed.as_secs_f64() / processed as f64;
    Duration::try_from_secs_f64(secs).ok()
}
