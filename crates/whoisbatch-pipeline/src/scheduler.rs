//! Batch scheduler: bounded worker pool, deferred retries, progress.
//!
//! One [`Scheduler`] owns all mutable state of a run (cache, finished set,
//! deferred queue, results). Workers get an immutable cache snapshot and
//! hand their result back; only the scheduler task writes.

use chrono::Utc;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Notify, Semaphore};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use whoisbatch_core::{FailureReason, ResolutionResult, Target};

use crate::block::block_key;
use crate::cache::{CacheSnapshot, LookupCache};
use crate::deferred::DeferredQueue;
use crate::error::{PipelineError, PipelineResult};
use crate::progress::{estimate_remaining, Progress, RunState};
use crate::resolver::{domain_result, simple_result, Resolution, Resolve};

/// Scheduler tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum resolutions in flight
    pub workers: usize,
    /// Longest single idle wait, so cancellation is noticed promptly
    pub idle_slice: Duration,
    /// How often progress is republished while a round runs
    pub poll_slice: Duration,
    /// Give every target a links-only result without any lookups
    pub simple_mode: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            idle_slice: Duration::from_secs(5),
            poll_slice: Duration::from_millis(100),
            simple_mode: false,
        }
    }
}

/// Cloneable cancellation signal for a running batch
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelHandle {
    /// Stop dispatching; in-flight lookups still complete
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Returns true once [`cancel`](Self::cancel) was called
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves when the batch is cancelled
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One terminal result per finished target, in submission order
    pub results: Vec<ResolutionResult>,
    /// Targets without a terminal result (only non-empty after cancellation)
    pub unresolved: Vec<String>,
    /// Whether the run was cancelled
    pub cancelled: bool,
    /// Final counters
    pub progress: Progress,
}

/// Drives a batch of targets to terminal results.
pub struct Scheduler<R> {
    resolver: Arc<R>,
    config: SchedulerConfig,
    cache: LookupCache,
    targets: Vec<Target>,
    by_identity: HashMap<String, usize>,
    finished: HashSet<String>,
    deferred: DeferredQueue,
    results: HashMap<String, ResolutionResult>,
    address_total: usize,
    address_finished: usize,
    state: RunState,
    started: Option<Instant>,
    cancel: CancelHandle,
    progress: watch::Sender<Progress>,
    sink: Option<mpsc::UnboundedSender<ResolutionResult>>,
}

impl<R: Resolve + 'static> Scheduler<R> {
    /// Create an idle scheduler
    pub fn new(resolver: R, config: SchedulerConfig) -> PipelineResult<Self> {
        if config.workers == 0 {
            return Err(PipelineError::InvalidConfig(
                "workers must be at least 1".into(),
            ));
        }
        if config.idle_slice.is_zero() || config.poll_slice.is_zero() {
            return Err(PipelineError::InvalidConfig(
                "idle and poll slices must be non-zero".into(),
            ));
        }
        let (progress, _) = watch::channel(Progress::default());
        Ok(Self {
            resolver: Arc::new(resolver),
            config,
            cache: LookupCache::new(),
            targets: Vec::new(),
            by_identity: HashMap::new(),
            finished: HashSet::new(),
            deferred: DeferredQueue::new(),
            results: HashMap::new(),
            address_total: 0,
            address_finished: 0,
            state: RunState::Idle,
            started: None,
            cancel: CancelHandle::default(),
            progress,
            sink: None,
        })
    }

    /// Start from an existing cache (e.g. one kept from a previous run)
    #[must_use]
    pub fn with_cache(mut self, cache: LookupCache) -> Self {
        self.cache = cache;
        self
    }

    /// Receive every terminal result as soon as it is recorded
    #[must_use]
    pub fn with_result_sink(mut self, sink: mpsc::UnboundedSender<ResolutionResult>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Handle that cancels this scheduler's run
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Live progress updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// The live cache
    #[must_use]
    pub const fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// Take the cache out, e.g. to seed the next run
    #[must_use]
    pub fn into_cache(self) -> LookupCache {
        self.cache
    }

    /// Current life-cycle state
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Run `targets` until every one is terminal or the run is cancelled.
    ///
    /// Duplicate and blank targets are dropped. Hostnames are finished
    /// immediately with an informational result.
    pub async fn run(&mut self, targets: impl IntoIterator<Item = Target>) -> PipelineResult<BatchReport> {
        if self.state != RunState::Idle {
            return Err(PipelineError::AlreadyStarted);
        }
        self.submit(targets);
        self.state = RunState::Running;
        self.started = Some(Instant::now());
        info!(
            targets = self.targets.len(),
            addresses = self.address_total,
            workers = self.config.workers,
            "batch started"
        );
        self.publish();

        if self.config.simple_mode {
            for target in self.targets.clone() {
                self.record_terminal(&target, simple_result(&target));
            }
        } else {
            for target in self.targets.clone().iter().filter(|t| !t.is_address()) {
                self.record_terminal(target, domain_result(target));
            }
            self.run_rounds().await;
        }

        let cancelled = self.cancel.is_cancelled();
        if cancelled {
            // pending retries die with the run; their targets stay unresolved
            self.deferred.clear();
        }
        self.state = RunState::Done;
        self.publish();
        info!(
            finished = self.finished.len(),
            pending = self.deferred.len(),
            cancelled,
            "batch done"
        );
        Ok(self.report(cancelled))
    }

    fn submit(&mut self, targets: impl IntoIterator<Item = Target>) {
        for target in targets {
            if target.normalized().is_empty() || self.by_identity.contains_key(target.raw()) {
                continue;
            }
            if target.is_address() {
                self.address_total += 1;
            }
            self.by_identity
                .insert(target.raw().to_string(), self.targets.len());
            self.targets.push(target);
        }
    }

    async fn run_rounds(&mut self) {
        let mut round = 0usize;
        loop {
            if self.cancel.is_cancelled() {
                self.state = RunState::Draining;
                self.publish();
                break;
            }

            let immediate = self.immediate();
            if immediate.is_empty() {
                if self.deferred.is_empty() {
                    break;
                }
                self.idle_wait().await;
                continue;
            }

            round += 1;
            let snapshot = self.cache.snapshot();
            let batch = self.hold_back_shared_blocks(immediate, &snapshot);
            debug!(round, dispatched = batch.len(), "dispatching round");
            self.dispatch(batch, snapshot).await;
        }
    }

    /// Unattempted targets in submission order, then retries that are due
    fn immediate(&mut self) -> Vec<Target> {
        let mut immediate: Vec<Target> = self
            .targets
            .iter()
            .filter(|t| !self.finished.contains(t.raw()) && !self.deferred.contains(t.raw()))
            .cloned()
            .collect();

        for identity in self.deferred.drain_ready(Utc::now()) {
            if let Some(&idx) = self.by_identity.get(&identity) {
                immediate.push(self.targets[idx].clone());
            }
        }
        immediate
    }

    /// Keep only the first uncached address of each block.
    ///
    /// The rest stay unattempted and pick up the cache entry next round.
    fn hold_back_shared_blocks(&self, immediate: Vec<Target>, snapshot: &CacheSnapshot) -> Vec<Target> {
        if !self.resolver.uses_block_cache() {
            return immediate;
        }
        let now = Utc::now();
        let mut claimed = HashSet::new();
        immediate
            .into_iter()
            .filter(|target| match block_key(target) {
                Some(key) if snapshot.lookup(&key, now).is_none() => claimed.insert(key),
                _ => true,
            })
            .collect()
    }

    async fn idle_wait(&mut self) {
        let wait = self
            .deferred
            .peek_earliest()
            .and_then(|at| (at - Utc::now()).to_std().ok())
            .unwrap_or(Duration::ZERO)
            .min(self.config.idle_slice);
        debug!(?wait, pending = self.deferred.len(), "all remaining targets deferred");
        self.publish();

        let cancel = self.cancel.clone();
        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            () = cancel.cancelled() => {}
        }
    }

    async fn dispatch(&mut self, batch: Vec<Target>, snapshot: CacheSnapshot) {
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut in_flight = FuturesUnordered::new();

        for target in batch {
            let resolver = Arc::clone(&self.resolver);
            let snapshot = snapshot.clone();
            let semaphore = Arc::clone(&semaphore);
            let cancel = self.cancel.clone();

            in_flight.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (target, None);
                };
                // queued but not started: leave it unattempted
                if cancel.is_cancelled() {
                    return (target, None);
                }
                let resolution = AssertUnwindSafe(resolver.resolve(&target, &snapshot))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Resolution::without_cache(ResolutionResult::failed(
                            target.raw(),
                            FailureReason::Internal,
                            "resolver panicked",
                        ))
                    });
                (target, Some(resolution))
            }));
        }

        loop {
            match tokio::time::timeout(self.config.poll_slice, in_flight.next()).await {
                Ok(Some(Ok((target, Some(resolution))))) => self.absorb(&target, resolution),
                Ok(Some(Ok((_, None)))) | Err(_) => {}
                Ok(Some(Err(e))) => warn!(error = %e, "worker task failed"),
                Ok(None) => break,
            }
            if self.cancel.is_cancelled() && self.state == RunState::Running {
                info!("cancel requested, draining in-flight lookups");
                self.state = RunState::Draining;
            }
            self.publish();
        }
    }

    fn absorb(&mut self, target: &Target, resolution: Resolution) {
        // cache data stays valid even if the run was cancelled meanwhile
        if let Some((key, entry)) = resolution.cache_update {
            self.cache.store(key, entry, Utc::now());
        }

        let result = resolution.result;
        match result.outcome.resume_at() {
            Some(_) if self.cancel.is_cancelled() => {
                debug!(target = %target, "rate limited while draining, dropped");
            }
            Some(resume_at) => {
                debug!(target = %target, %resume_at, "deferred");
                self.deferred.add(target.raw(), resume_at);
            }
            None => self.record_terminal(target, result),
        }
    }

    fn record_terminal(&mut self, target: &Target, result: ResolutionResult) {
        if !self.finished.insert(target.raw().to_string()) {
            return;
        }
        if target.is_address() {
            self.address_finished += 1;
        }
        if let Some(sink) = &self.sink {
            let _ = sink.send(result.clone());
        }
        self.results.insert(target.raw().to_string(), result);
    }

    fn snapshot_progress(&self) -> Progress {
        let elapsed = self.started.map(|s| s.elapsed()).unwrap_or_default();
        Progress {
            state: self.state,
            processed: self.address_finished,
            total: self.address_total,
            pending: self.deferred.len(),
            finished: self.finished.len(),
            targets: self.targets.len(),
            cache_entries: self.cache.len(),
            elapsed,
            eta: estimate_remaining(self.address_finished, self.address_total, elapsed),
            next_retry_in: self
                .deferred
                .peek_earliest()
                .map(|at| (at - Utc::now()).to_std().unwrap_or(Duration::ZERO)),
        }
    }

    fn publish(&self) {
        self.progress.send_replace(self.snapshot_progress());
    }

    fn report(&mut self, cancelled: bool) -> BatchReport {
        let mut results = Vec::with_capacity(self.results.len());
        let mut unresolved = Vec::new();
        for target in &self.targets {
            match self.results.remove(target.raw()) {
                Some(result) => results.push(result),
                None => unresolved.push(target.raw().to_string()),
            }
        }
        BatchReport {
            results,
            unresolved,
            cancelled,
            progress: self.snapshot_progress(),
        }
    }
}

impl<R> std::fmt::Debug for Scheduler<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("targets", &self.targets.len())
            .field("finished", &self.finished.len())
            .field("deferred", &self.deferred.len())
            .finish_non_exhaustive()
    }
}
