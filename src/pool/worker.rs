//! Worker thread implementation

use crate::core::{Result, ThreadError, WorkItem};
use crate::pool::config::PoolMode;
use crate::pool::registry::{WorkerId, WorkerState};
use crate::pool::stats::PoolStats;
use crate::pool::thread_pool::{PoolInner, PoolState, Shared};
use log::{debug, trace, warn};
use std::cell::Cell;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use uuid::Uuid;

#[cfg(feature = "tracing")]
use tracing::{span, Level};

thread_local! {
    /// Pool and worker identity of the current thread, if it is a worker
    static CURRENT_WORKER: Cell<Option<(Uuid, WorkerId)>> = const { Cell::new(None) };
}

/// Returns the worker id if the calling thread is a worker of pool `pool_id`
pub(crate) fn current_worker(pool_id: Uuid) -> Option<WorkerId> {
    CURRENT_WORKER.with(|current| match current.get() {
        Some((pool, worker)) if pool == pool_id => Some(worker),
        _ => None,
    })
}

/// Why a worker left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitReason {
    Shutdown,
    IdleReclaimed,
}

impl ExitReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::IdleReclaimed => "idle_reclaimed",
        }
    }
}

/// A worker thread bound to one pool
///
/// The thread is detached; its lifetime is tracked through the registry and
/// the `all_exited` condition.
pub(crate) struct Worker {
    id: WorkerId,
    shared: Arc<Shared>,
}

/// Spawns the OS thread for a worker that is already registered.
///
/// On failure the caller must [`forget`] the registration.
pub(crate) fn spawn(shared: &Arc<Shared>, id: WorkerId, thread_name: String) -> Result<()> {
    let worker = Worker {
        id,
        shared: Arc::clone(shared),
    };
    thread::Builder::new()
        .name(thread_name)
        .spawn(move || worker.run())
        .map(|_detached| ())
        .map_err(|e| ThreadError::spawn_with_source(id, "Failed to create OS thread", e))
}

/// Removes a registration whose thread never started
pub(crate) fn forget(shared: &Shared, id: WorkerId) {
    let mut inner = shared.inner.lock();
    if inner.registry.remove(id) {
        warn!("pool {}: worker {} abandoned before start", shared.id, id);
    }
    if inner.registry.is_empty() {
        shared.all_exited.notify_all();
    }
}

impl Worker {
    fn run(self) {
        CURRENT_WORKER.with(|current| current.set(Some((self.shared.id, self.id))));

        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", id = self.id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        debug!("pool {}: worker {} started", self.shared.id, self.id);

        let mut idle_since = Instant::now();
        while let Some(item) = self.next_item(&mut idle_since) {
            self.execute(item);
            idle_since = Instant::now();
        }

        CURRENT_WORKER.with(|current| current.set(None));
    }

    /// Blocks until there is an item to run, or returns `None` once the
    /// worker has deregistered.
    fn next_item(&self, idle_since: &mut Instant) -> Option<WorkItem> {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        inner.registry.set_state(self.id, WorkerState::Idle);

        loop {
            if let Some(item) = inner.queue.pop_highest() {
                inner.registry.set_state(self.id, WorkerState::Executing);
                if !inner.queue.is_empty() {
                    shared.not_empty.notify_one();
                }
                shared.not_full.notify_one();
                return Some(item);
            }

            if inner.state != PoolState::Running {
                self.deregister(&mut inner, ExitReason::Shutdown);
                return None;
            }

            match inner.config.mode {
                PoolMode::Fixed => shared.not_empty.wait(&mut inner),
                PoolMode::Elastic => {
                    let deadline = *idle_since + inner.config.idle_timeout;
                    let timed_out = shared.not_empty.wait_until(&mut inner, deadline).timed_out();
                    if timed_out && inner.queue.is_empty() && inner.state == PoolState::Running {
                        if inner.registry.len() > inner.config.initial_threads {
                            self.deregister(&mut inner, ExitReason::IdleReclaimed);
                            return None;
                        }
                        // At the floor: start a fresh idle window
                        *idle_since = Instant::now();
                    }
                }
            }
        }
    }

    fn deregister(&self, inner: &mut PoolInner, reason: ExitReason) {
        inner.registry.set_state(self.id, WorkerState::Exiting);
        inner.registry.remove(self.id);
        if reason == ExitReason::IdleReclaimed {
            PoolStats::bump(&self.shared.stats.workers_reclaimed);
        }
        debug!(
            "pool {}: worker {} exiting ({}), {} remain",
            self.shared.id,
            self.id,
            reason.as_str(),
            inner.registry.len()
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_worker_exit(self.id, reason.as_str());

        if inner.registry.is_empty() {
            self.shared.all_exited.notify_all();
        }
    }

    fn execute(&self, item: WorkItem) {
        let weight = item.weight();
        let job_type = item.job_type().to_string();

        #[cfg(feature = "tracing")]
        let job_span = span!(Level::DEBUG, "job_execution", job_type = %job_type, weight = weight);
        #[cfg(feature = "tracing")]
        let _job_guard = job_span.enter();

        let start = Instant::now();
        let outcome = item.run();
        let elapsed = start.elapsed();

        match &outcome {
            Ok(()) => trace!(
                "worker {}: '{}' (weight {}) done in {:?}",
                self.id,
                job_type,
                weight,
                elapsed
            ),
            Err(e) => warn!(
                "[WORKER {}] Task '{}' (weight {}) failed: {}",
                self.id, job_type, weight, e
            ),
        }

        #[cfg(feature = "tracing")]
        match &outcome {
            Err(ThreadError::TaskPanicked { .. }) => crate::tracing::metrics::record_panic(elapsed),
            other => crate::tracing::metrics::record_completion(elapsed, other.is_ok()),
        }

        self.shared.stats.record_outcome(outcome.is_ok());
    }
}
