//! Worker registry
//!
//! Live workers keyed by a monotonically increasing identity. The registry is
//! the authoritative source for thread counts: the current count is its
//! length and the idle count is the number of entries in
//! [`WorkerState::Idle`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Identity of a worker, unique for the lifetime of its pool
pub type WorkerId = u64;

/// Run state of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Waiting for work (also the state of a registered, not yet running worker)
    Idle,
    /// Running a task
    Executing,
    /// Observed a stop condition and is deregistering.
    ///
    /// Held only inside the worker's final critical section, which also
    /// removes the entry, so snapshots never report it.
    Exiting,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Executing => f.write_str("executing"),
            Self::Exiting => f.write_str("exiting"),
        }
    }
}

/// Snapshot of one registered worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerInfo {
    /// Worker identity
    pub id: WorkerId,
    /// Run state at the time of the snapshot
    pub state: WorkerState,
    /// OS thread name
    pub thread_name: String,
    /// When the worker was registered
    pub spawned_at: DateTime<Utc>,
    /// Tasks run by this worker so far
    pub tasks_run: u64,
}

#[derive(Debug)]
struct WorkerEntry {
    state: WorkerState,
    thread_name: String,
    spawned_at: DateTime<Utc>,
    tasks_run: u64,
}

/// Map of live workers
#[derive(Debug, Default)]
pub struct WorkerRegistry {
    workers: HashMap<WorkerId, WorkerEntry>,
    next_id: WorkerId,
}

impl WorkerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new idle worker and returns its identity and thread name.
    ///
    /// Identities are never reused.
    pub fn register(&mut self, name_prefix: &str) -> (WorkerId, String) {
        let id = self.next_id;
        self.next_id += 1;
        let thread_name = format!("{}-{}", name_prefix, id);
        self.workers.insert(
            id,
            WorkerEntry {
                state: WorkerState::Idle,
                thread_name: thread_name.clone(),
                spawned_at: Utc::now(),
                tasks_run: 0,
            },
        );
        (id, thread_name)
    }

    /// Updates a worker's state. Returns `false` for an unknown identity.
    pub fn set_state(&mut self, id: WorkerId, state: WorkerState) -> bool {
        match self.workers.get_mut(&id) {
            Some(entry) => {
                if state == WorkerState::Executing && entry.state != WorkerState::Executing {
                    entry.tasks_run += 1;
                }
                entry.state = state;
                true
            }
            None => false,
        }
    }

    /// Current state of a worker
    pub fn state(&self, id: WorkerId) -> Option<WorkerState> {
        self.workers.get(&id).map(|e| e.state)
    }

    /// Removes a worker. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: WorkerId) -> bool {
        self.workers.remove(&id).is_some()
    }

    /// Number of live workers
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether no worker is registered
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Number of workers in the idle state
    pub fn idle_count(&self) -> usize {
        self.workers
            .values()
            .filter(|e| e.state == WorkerState::Idle)
            .count()
    }

    /// Snapshot of every worker, ordered by identity
    pub fn snapshot(&self) -> Vec<WorkerInfo> {
        let mut infos: Vec<WorkerInfo> = self
            .workers
            .iter()
            .map(|(id, e)| WorkerInfo {
                id: *id,
                state: e.state,
                thread_name: e.thread_name.clone(),
                spawned_at: e.spawned_at,
                tasks_run: e.tasks_run,
            })
            .collect();
        infos.sort_by_key(|i| i.id);
        infos
    }
}
