//! Process-wide Tor exit-address directory with a 24 hour refresh.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use whoisbatch_client::LookupClient;
use whoisbatch_core::ExitNodeSet;

/// How long a fetched list is reused
pub const EXIT_LIST_TTL_SECS: i64 = 24 * 60 * 60;

/// Fetches the exit list on first use and re-fetches once it is a day old.
///
/// A failed fetch yields an empty set for that call and is not remembered,
/// so the next call tries again.
pub struct ExitNodeDirectory {
    client: LookupClient,
    ttl: Duration,
    state: Mutex<Option<(Arc<ExitNodeSet>, DateTime<Utc>)>>,
}

impl ExitNodeDirectory {
    /// Directory backed by `client`
    #[must_use]
    pub fn new(client: LookupClient) -> Self {
        Self {
            client,
            ttl: Duration::seconds(EXIT_LIST_TTL_SECS),
            state: Mutex::new(None),
        }
    }

    /// Current exit set, fetching when missing or stale
    pub async fn current(&self) -> Arc<ExitNodeSet> {
        self.current_at(Utc::now()).await
    }

    async fn current_at(&self, now: DateTime<Utc>) -> Arc<ExitNodeSet> {
        let mut state = self.state.lock().await;
        if let Some((set, fetched_at)) = state.as_ref() {
            if now.signed_duration_since(*fetched_at) < self.ttl {
                debug!(count = set.len(), "reusing exit list");
                return Arc::clone(set);
            }
        }

        match self.client.exit_nodes().fetch().await {
            Ok(set) => {
                let set = Arc::new(set);
                *state = Some((Arc::clone(&set), now));
                set
            }
            Err(e) => {
                warn!(error = %e, "exit list unavailable, Tor detection disabled for this run");
                Arc::new(ExitNodeSet::default())
            }
        }
    }
}

impl std::fmt::Debug for ExitNodeDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitNodeDirectory")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
