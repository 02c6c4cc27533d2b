//! Holding area for rate-limited targets.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Targets waiting for their resume time, keyed by target identity.
///
/// A target appears at most once; re-adding it replaces the old resume time.
#[derive(Debug, Default, Clone)]
pub struct DeferredQueue {
    entries: HashMap<String, DateTime<Utc>>,
}

impl DeferredQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the resume time for `target`
    pub fn add(&mut self, target: impl Into<String>, resume_at: DateTime<Utc>) {
        self.entries.insert(target.into(), resume_at);
    }

    /// Remove and return every target whose resume time has passed.
    ///
    /// Returned in resume order, ties broken by target.
    pub fn drain_ready(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut ready: Vec<(DateTime<Utc>, String)> = self
            .entries
            .iter()
            .filter(|(_, resume_at)| **resume_at <= now)
            .map(|(target, resume_at)| (*resume_at, target.clone()))
            .collect();
        ready.sort();

        for (_, target) in &ready {
            self.entries.remove(target);
        }
        ready.into_iter().map(|(_, target)| target).collect()
    }

    /// Smallest resume time, if any
    #[must_use]
    pub fn peek_earliest(&self) -> Option<DateTime<Utc>> {
        self.entries.values().min().copied()
    }

    /// Returns true if `target` is waiting
    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.entries.contains_key(target)
    }

    /// Number of waiting targets
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is waiting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every waiting target
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_add_overwrites() {
        let now = Utc::now();
        let mut queue = DeferredQueue::new();
        queue.add("1.2.3.4", now + Duration::seconds(60));
        queue.add("1.2.3.4", now + Duration::seconds(5));

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek_earliest(), Some(now + Duration::seconds(5)));
    }

    #[test]
    fn test_drain_ready_only_removes_due() {
        let now = Utc::now();
        let mut queue = DeferredQueue::new();
        queue.add("a", now - Duration::seconds(1));
        queue.add("b", now);
        queue.add("c", now + Duration::seconds(30));

        let ready = queue.drain_ready(now);
        assert_eq!(ready, vec!["a".to_string(), "b".to_string()]);
        assert!(queue.contains("c"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_drain_orders_by_resume_time() {
        let now = Utc::now();
        let mut queue = DeferredQueue::new();
        queue.add("late", now - Duration::seconds(1));
        queue.add("early", now - Duration::seconds(10));

        assert_eq!(queue.drain_ready(now), vec!["early", "late"]);
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = DeferredQueue::new();
        assert!(queue.peek_earliest().is_none());
        assert!(queue.drain_ready(Utc::now()).is_empty());
        assert!(queue.is_empty());
    }
}
