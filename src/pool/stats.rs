//! Pool statistics and status snapshots

use crate::pool::config::PoolMode;
use crate::pool::PoolState;
use crate::queue::RejectionPolicy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Cumulative task counters for a pool
///
/// Counters are monotonic and only used for reporting.
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Tasks admitted to the queue
    pub tasks_submitted: AtomicU64,
    /// Tasks that ran to completion
    pub tasks_completed: AtomicU64,
    /// Tasks that panicked or returned an error
    pub tasks_failed: AtomicU64,
    /// Submissions refused under the `Abort` policy
    pub tasks_rejected: AtomicU64,
    /// Submissions dropped under the `Discard` policy
    pub tasks_discarded: AtomicU64,
    /// Submissions executed by the caller under `RunInCaller`
    pub tasks_run_in_caller: AtomicU64,
    /// Workers spawned over the pool's lifetime
    pub workers_spawned: AtomicU64,
    /// Elastic workers that exited after the idle timeout
    pub workers_reclaimed: AtomicU64,
}

impl PoolStats {
    /// Create new statistics
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one executed task
    pub(crate) fn record_outcome(&self, succeeded: bool) {
        if succeeded {
            Self::bump(&self.tasks_completed);
        } else {
            Self::bump(&self.tasks_failed);
        }
    }

    /// Get total tasks submitted
    pub fn get_tasks_submitted(&self) -> u64 {
        self.tasks_submitted.load(Ordering::Relaxed)
    }

    /// Get total tasks completed
    pub fn get_tasks_completed(&self) -> u64 {
        self.tasks_completed.load(Ordering::Relaxed)
    }

    /// Get total tasks failed
    pub fn get_tasks_failed(&self) -> u64 {
        self.tasks_failed.load(Ordering::Relaxed)
    }

    /// Get total submissions rejected
    pub fn get_tasks_rejected(&self) -> u64 {
        self.tasks_rejected.load(Ordering::Relaxed)
    }

    /// Get total submissions discarded
    pub fn get_tasks_discarded(&self) -> u64 {
        self.tasks_discarded.load(Ordering::Relaxed)
    }

    /// Get total submissions run by the caller
    pub fn get_tasks_run_in_caller(&self) -> u64 {
        self.tasks_run_in_caller.load(Ordering::Relaxed)
    }

    /// Get total workers spawned
    pub fn get_workers_spawned(&self) -> u64 {
        self.workers_spawned.load(Ordering::Relaxed)
    }

    /// Get total workers reclaimed after idling
    pub fn get_workers_reclaimed(&self) -> u64 {
        self.workers_reclaimed.load(Ordering::Relaxed)
    }
}

/// Point-in-time view of a pool, taken under a single lock acquisition
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    /// Pool identity
    pub pool_id: Uuid,
    /// Lifecycle state
    pub state: PoolState,
    /// Configured mode
    pub mode: PoolMode,
    /// Rejection policy in effect
    pub rejection_policy: RejectionPolicy,
    /// Live worker threads
    pub current_threads: usize,
    /// Workers waiting for work
    pub idle_threads: usize,
    /// Workers running a task
    pub active_threads: usize,
    /// Tasks waiting in the queue
    pub pending_tasks: usize,
    /// Queue ceiling
    pub queue_capacity: usize,
    /// Thread ceiling (elastic mode)
    pub thread_ceiling: usize,
    /// Tasks admitted so far
    pub tasks_submitted: u64,
    /// Tasks completed so far
    pub tasks_completed: u64,
    /// Tasks failed so far
    pub tasks_failed: u64,
    /// When the snapshot was taken
    pub sampled_at: DateTime<Utc>,
}

impl PoolStatus {
    /// Render the snapshot as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
