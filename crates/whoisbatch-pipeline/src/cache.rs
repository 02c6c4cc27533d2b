//! Network-block lookup cache.
//!
//! Workers only ever see a [`CacheSnapshot`] taken when a round is
//! dispatched. Entries written while that round runs become visible to the
//! next round's snapshot, never to the current one.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use whoisbatch_core::{BlockKey, CacheEntry};

/// Maximum age of an entry that may satisfy a lookup
pub const FRESHNESS_WINDOW_SECS: i64 = 24 * 60 * 60;

/// Live cache owned by the scheduler
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: HashMap<BlockKey, CacheEntry>,
}

impl LookupCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable copy of the current entries
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            entries: Arc::new(self.entries.clone()),
        }
    }

    /// Upsert an entry, stamping it with `now`
    pub fn store(&mut self, key: BlockKey, mut entry: CacheEntry, now: DateTime<Utc>) {
        entry.stored_at = now;
        self.entries.insert(key, entry);
    }

    /// Raw access, ignoring freshness
    #[must_use]
    pub fn get(&self, key: &BlockKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Number of blocks held (fresh or stale)
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only view handed to workers
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    entries: Arc<HashMap<BlockKey, CacheEntry>>,
}

impl CacheSnapshot {
    /// Entry for `key` if it is younger than the freshness window.
    ///
    /// Stale entries are reported as a miss but left in place.
    #[must_use]
    pub fn lookup(&self, key: &BlockKey, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .filter(|entry| is_fresh(entry, now))
    }

    /// Number of blocks in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_fresh(entry: &CacheEntry, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(entry.stored_at) < Duration::seconds(FRESHNESS_WINDOW_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(org: &str, stored_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry {
            organization: org.to_string(),
            country_code: Some("US".into()),
            country_name: Some("United States".into()),
            stored_at,
        }
    }

    #[test]
    fn test_fresh_entry_hits() {
        let now = Utc::now();
        let key = BlockKey::new("8.8.8.0/24");
        let mut cache = LookupCache::new();
        cache.store(key.clone(), entry("Google LLC", now), now);

        let snapshot = cache.snapshot();
        let hit = snapshot.lookup(&key, now + Duration::hours(23)).unwrap();
        assert_eq!(hit.organization, "Google LLC");
    }

    #[test]
    fn test_stale_entry_misses_but_is_kept() {
        let now = Utc::now();
        let key = BlockKey::new("8.8.8.0/24");
        let mut cache = LookupCache::new();
        cache.store(key.clone(), entry("Google LLC", now), now);

        let later = now + Duration::seconds(FRESHNESS_WINDOW_SECS);
        assert!(cache.snapshot().lookup(&key, later).is_none());
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn test_store_refreshes_timestamp() {
        let now = Utc::now();
        let key = BlockKey::new("1.1.1.0/24");
        let mut cache = LookupCache::new();
        let old = now - Duration::hours(30);
        cache.store(key.clone(), entry("Cloudflare", old), old);
        assert!(cache.snapshot().lookup(&key, now).is_none());

        // the entry carries an old stored_at; store() must overwrite it
        cache.store(key.clone(), entry("Cloudflare", old), now);
        assert_eq!(cache.get(&key).unwrap().stored_at, now);
        assert!(cache.snapshot().lookup(&key, now).is_some());
    }

    #[test]
    fn test_snapshot_isolated_from_later_writes() {
        let now = Utc::now();
        let key = BlockKey::new("9.9.9.0/24");
        let mut cache = LookupCache::new();
        let snapshot = cache.snapshot();
        cache.store(key.clone(), entry("Quad9", now), now);

        assert!(snapshot.lookup(&key, now).is_none());
        assert!(cache.snapshot().lookup(&key, now).is_some());
    }
}
