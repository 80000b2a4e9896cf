//! Thread pool implementation

use crate::core::{ClosureJob, Job, Result, TaskHandle, ThreadError, WorkItem, DEFAULT_WEIGHT};
use crate::pool::config::{PoolConfig, PoolMode};
use crate::pool::registry::{WorkerId, WorkerInfo, WorkerRegistry};
use crate::pool::stats::{PoolStats, PoolStatus};
use crate::pool::worker;
use crate::queue::{BoundedPriorityQueue, RejectionPolicy};
use chrono::Utc;
use log::{debug, error, info, warn};
use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Lifecycle state of a pool
///
/// `Created → Running → ShuttingDown → Stopped`. A pool that is shut down
/// before it was ever started goes straight from `Created` to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolState {
    /// Configurable, not yet started
    Created,
    /// Accepting and executing work
    Running,
    /// Draining the queue; new work is refused
    ShuttingDown,
    /// Every worker has exited
    Stopped,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Running => f.write_str("running"),
            Self::ShuttingDown => f.write_str("shutting_down"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}

/// Everything guarded by the coordination lock
pub(crate) struct PoolInner {
    pub(crate) state: PoolState,
    pub(crate) config: PoolConfig,
    pub(crate) queue: BoundedPriorityQueue,
    pub(crate) registry: WorkerRegistry,
}

impl PoolInner {
    fn register_worker(&mut self) -> (WorkerId, String) {
        self.registry.register(&self.config.thread_name_prefix)
    }

    /// Registers one extra worker when an elastic pool has more pending work
    /// than idle workers and is below its ceiling.
    fn plan_growth(&mut self) -> Option<(WorkerId, String)> {
        let wants_worker = self.config.mode == PoolMode::Elastic
            && self.queue.len() > self.registry.idle_count()
            && self.registry.len() < self.config.thread_ceiling;
        wants_worker.then(|| self.register_worker())
    }
}

/// State shared between the pool handle and its workers
pub(crate) struct Shared {
    pub(crate) id: Uuid,
    pub(crate) inner: Mutex<PoolInner>,
    /// Queue gained space
    pub(crate) not_full: Condvar,
    /// Queue gained an item, or the pool is stopping
    pub(crate) not_empty: Condvar,
    /// The last worker left the registry
    pub(crate) all_exited: Condvar,
    pub(crate) stats: PoolStats,
}

/// A bounded pool of worker threads executing weighted tasks
///
/// # Scheduling
///
/// Pending tasks are kept in a max-heap keyed by weight; a free worker always
/// takes the heaviest task. Tasks of equal weight run in no particular order.
///
/// # Backpressure
///
/// `submit` waits up to [`PoolConfig::submit_timeout`] for queue space, then
/// applies the [`RejectionPolicy`].
///
/// # Shutdown
///
/// [`ThreadPool::shutdown`] refuses new work, lets the workers drain the
/// queue, and blocks until every worker has exited. Dropping the pool does
/// the same.
///
/// # Example
///
/// ```rust
/// use rust_priority_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = ThreadPool::new();
/// pool.set_mode(PoolMode::Fixed);
/// pool.start(2)?;
///
/// let urgent = pool.submit_with_priority(10, || "urgent")?;
/// let routine = pool.submit(|| "routine")?;
///
/// assert_eq!(urgent.wait()?, "urgent");
/// assert_eq!(routine.wait()?, "routine");
/// pool.shutdown()?;
/// # Ok(())
/// # }
/// ```
pub struct ThreadPool {
    shared: Arc<Shared>,
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("ThreadPool")
            .field("id", &self.shared.id)
            .field("state", &inner.state)
            .field("config", &inner.config)
            .field("threads", &inner.registry.len())
            .field("pending", &inner.queue.len())
            .finish()
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadPool {
    /// Create a pool with default configuration
    pub fn new() -> Self {
        Self::from_config(PoolConfig::default())
    }

    /// Create a pool from a validated configuration
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: PoolConfig) -> Self {
        let queue = BoundedPriorityQueue::new(config.queue_capacity);
        Self {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                inner: Mutex::new(PoolInner {
                    state: PoolState::Created,
                    config,
                    queue,
                    registry: WorkerRegistry::new(),
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
                all_exited: Condvar::new(),
                stats: PoolStats::new(),
            }),
        }
    }

    /// Applies a configuration change if the pool has not been started.
    ///
    /// Returns whether the change took effect.
    fn configure<F>(&self, what: &str, apply: F) -> bool
    where
        F: FnOnce(&mut PoolInner) -> bool,
    {
        let mut inner = self.shared.inner.lock();
        if inner.state != PoolState::Created {
            debug!(
                "pool {}: ignoring {} change in state {}",
                self.shared.id, what, inner.state
            );
            return false;
        }
        apply(&mut inner)
    }

    /// Set fixed or elastic mode. No-op once started.
    pub fn set_mode(&self, mode: PoolMode) -> bool {
        self.configure("mode", |inner| {
            inner.config.mode = mode;
            true
        })
    }

    /// Set the queue ceiling. No-op once started.
    pub fn set_queue_capacity(&self, capacity: usize) -> bool {
        self.configure("queue capacity", |inner| {
            inner.config.queue_capacity = capacity;
            inner.queue.set_capacity(capacity);
            true
        })
    }

    /// Set the elastic thread ceiling.
    ///
    /// Only applies while the mode is [`PoolMode::Elastic`] and the pool has
    /// not been started; call [`set_mode`](Self::set_mode) first.
    pub fn set_thread_ceiling(&self, ceiling: usize) -> bool {
        self.configure("thread ceiling", |inner| {
            if inner.config.mode != PoolMode::Elastic {
                return false;
            }
            inner.config.thread_ceiling = ceiling;
            true
        })
    }

    /// Set the rejection policy. Allowed at any time; affects only later
    /// submissions.
    pub fn set_rejection_policy(&self, policy: RejectionPolicy) {
        let mut inner = self.shared.inner.lock();
        if inner.config.rejection_policy != policy {
            debug!(
                "pool {}: rejection policy {} -> {}",
                self.shared.id, inner.config.rejection_policy, policy
            );
            inner.config.rejection_policy = policy;
        }
    }

    /// Start the pool with `initial_threads` workers
    ///
    /// # Errors
    ///
    /// - `ThreadError::AlreadyStarted` - The pool has left the `Created` state
    /// - `ThreadError::InvalidConfig` - The configuration does not validate
    /// - `ThreadError::SpawnError` - A worker thread could not be created; the
    ///   pool is shut down before the error is returned
    pub fn start(&self, initial_threads: usize) -> Result<()> {
        let (registered, mode) = {
            let mut inner = self.shared.inner.lock();
            if inner.state != PoolState::Created {
                return Err(ThreadError::already_started(inner.state));
            }
            inner.config.initial_threads = initial_threads;
            inner.config.validate()?;
            inner.state = PoolState::Running;

            let registered: Vec<(WorkerId, String)> =
                (0..initial_threads).map(|_| inner.register_worker()).collect();
            (registered, inner.config.mode)
        };

        // Threads are created outside the lock
        let mut pending = registered.into_iter();
        while let Some((id, thread_name)) = pending.next() {
            if let Err(e) = self.spawn_worker(id, thread_name) {
                error!("pool {}: start aborted: {}", self.shared.id, e);
                for (unspawned, _) in pending {
                    worker::forget(&self.shared, unspawned);
                }
                self.shutdown()?;
                return Err(e);
            }
        }

        info!(
            "pool {} started with {} workers ({} mode)",
            self.shared.id, initial_threads, mode
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_start(initial_threads, &mode.to_string());
        Ok(())
    }

    fn spawn_worker(&self, id: WorkerId, thread_name: String) -> Result<()> {
        match worker::spawn(&self.shared, id, thread_name) {
            Ok(()) => {
                PoolStats::bump(&self.shared.stats.workers_spawned);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_worker_spawned(id);
                Ok(())
            }
            Err(e) => {
                worker::forget(&self.shared, id);
                Err(e)
            }
        }
    }

    /// Submit a closure with the default weight
    pub fn submit<T, F>(&self, f: F) -> Result<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.submit_with_priority(DEFAULT_WEIGHT, f)
    }

    /// Submit a closure with a scheduling weight (higher runs first)
    ///
    /// # Errors
    ///
    /// - `ThreadError::PoolNotAccepting` - The pool is not running
    /// - `ThreadError::SubmissionRejected` - The queue stayed full and the
    ///   policy is `Abort`
    ///
    /// Under `Discard` the returned handle reports
    /// [`ThreadError::TaskDiscarded`]; under `RunInCaller` the handle is
    /// already fulfilled when this returns.
    pub fn submit_with_priority<T, F>(&self, weight: i32, f: F) -> Result<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (job, handle) = ClosureJob::new(f);
        self.dispatch(WorkItem::new(weight, Box::new(job)))?;
        Ok(handle)
    }

    /// Submit a named closure; the name shows up in logs and on the handle
    pub fn submit_named<T, F, S>(&self, weight: i32, name: S, f: F) -> Result<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
        S: Into<String>,
    {
        let (job, handle) = ClosureJob::with_name(f, name);
        self.dispatch(WorkItem::new(weight, Box::new(job)))?;
        Ok(handle)
    }

    /// Submit a custom [`Job`]
    pub fn submit_job<J: Job + 'static>(&self, weight: i32, job: J) -> Result<()> {
        self.dispatch(WorkItem::new(weight, Box::new(job)))
    }

    /// Submit a custom [`Job`] that runs inside the caller's current tracing
    /// span
    #[cfg(feature = "tracing")]
    pub fn submit_traced<J: Job + 'static>(&self, weight: i32, job: J) -> Result<()> {
        self.submit_job(weight, crate::tracing::TracedJob::new(job))
    }

    fn dispatch(&self, item: WorkItem) -> Result<()> {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        if inner.state != PoolState::Running {
            return Err(ThreadError::not_accepting(inner.state));
        }

        let started = Instant::now();
        let deadline = started + inner.config.submit_timeout;
        shared.not_full.wait_while_until(
            &mut inner,
            |i| i.queue.is_full() && i.state == PoolState::Running,
            deadline,
        );
        if inner.state != PoolState::Running {
            return Err(ThreadError::not_accepting(inner.state));
        }

        let item = match inner.queue.push(item) {
            Ok(()) => {
                shared.not_empty.notify_one();
                PoolStats::bump(&shared.stats.tasks_submitted);
                let growth = inner.plan_growth();
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_submission(inner.queue.len());
                drop(inner);

                if let Some((id, thread_name)) = growth {
                    match self.spawn_worker(id, thread_name) {
                        Ok(()) => debug!("pool {}: elastic growth, worker {} added", shared.id, id),
                        Err(e) => warn!("pool {}: elastic growth failed: {}", shared.id, e),
                    }
                }
                return Ok(());
            }
            Err(item) => item,
        };

        // The queue stayed full for the whole wait
        let policy = inner.config.rejection_policy;
        let capacity = inner.queue.capacity();
        drop(inner);

        let waited_ms = started.elapsed().as_millis() as u64;
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_rejection(policy.as_str());
        match policy {
            RejectionPolicy::Abort => {
                PoolStats::bump(&shared.stats.tasks_rejected);
                warn!(
                    "pool {}: queue full ({} slots) after {}ms, rejecting '{}'",
                    shared.id,
                    capacity,
                    waited_ms,
                    item.job_type()
                );
                Err(ThreadError::rejected(capacity, waited_ms))
            }
            RejectionPolicy::Discard => {
                PoolStats::bump(&shared.stats.tasks_discarded);
                debug!(
                    "pool {}: queue full, discarding '{}'",
                    shared.id,
                    item.job_type()
                );
                drop(item);
                Ok(())
            }
            RejectionPolicy::RunInCaller => {
                PoolStats::bump(&shared.stats.tasks_run_in_caller);
                debug!(
                    "pool {}: queue full, running '{}' in caller",
                    shared.id,
                    item.job_type()
                );
                let outcome = item.run();
                if let Err(e) = &outcome {
                    warn!("pool {}: caller-run task failed: {}", shared.id, e);
                }
                shared.stats.record_outcome(outcome.is_ok());
                Ok(())
            }
        }
    }

    /// Shutdown the pool and wait for all workers to finish
    ///
    /// # Graceful Shutdown
    ///
    /// 1. Stops accepting new work (state becomes `ShuttingDown`)
    /// 2. Wakes idle workers and blocked submitters
    /// 3. Waits until the workers have drained the queue and exited
    ///
    /// Calling it again, or concurrently, waits for the same drain and
    /// returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// - `ThreadError::ShutdownFromWorker` - Called from one of this pool's
    ///   workers, which would otherwise wait for itself
    pub fn shutdown(&self) -> Result<()> {
        if let Some(worker_id) = worker::current_worker(self.shared.id) {
            return Err(ThreadError::ShutdownFromWorker { worker_id });
        }

        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        match inner.state {
            PoolState::Created => {
                inner.state = PoolState::Stopped;
                debug!("pool {} stopped before start", shared.id);
                return Ok(());
            }
            PoolState::Stopped => return Ok(()),
            PoolState::Running => Self::begin_shutdown(shared, &mut inner),
            PoolState::ShuttingDown => {}
        }

        shared
            .all_exited
            .wait_while(&mut inner, |i| !i.registry.is_empty());

        if inner.state != PoolState::Stopped {
            inner.state = PoolState::Stopped;
            info!(
                "pool {} shutdown complete ({} tasks completed, {} failed)",
                shared.id,
                shared.stats.get_tasks_completed(),
                shared.stats.get_tasks_failed()
            );
            #[cfg(feature = "tracing")]
            crate::tracing::metrics::record_pool_shutdown(
                shared.stats.get_tasks_completed(),
                shared.stats.get_tasks_failed(),
            );
        }
        Ok(())
    }

    fn begin_shutdown(shared: &Shared, inner: &mut PoolInner) {
        inner.state = PoolState::ShuttingDown;
        info!(
            "pool {} shutting down ({} tasks pending, {} workers)",
            shared.id,
            inner.queue.len(),
            inner.registry.len()
        );
        shared.not_empty.notify_all();
        shared.not_full.notify_all();
    }

    /// Pool identity used in logs
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> PoolState {
        self.shared.inner.lock().state
    }

    /// Check if the pool is running
    pub fn is_running(&self) -> bool {
        self.state() == PoolState::Running
    }

    /// Configured mode
    pub fn mode(&self) -> PoolMode {
        self.shared.inner.lock().config.mode
    }

    /// Rejection policy in effect
    pub fn rejection_policy(&self) -> RejectionPolicy {
        self.shared.inner.lock().config.rejection_policy
    }

    /// Queue ceiling
    pub fn queue_capacity(&self) -> usize {
        self.shared.inner.lock().queue.capacity()
    }

    /// Elastic thread ceiling
    pub fn thread_ceiling(&self) -> usize {
        self.shared.inner.lock().config.thread_ceiling
    }

    /// Copy of the current configuration
    pub fn config(&self) -> PoolConfig {
        self.shared.inner.lock().config.clone()
    }

    /// Number of live worker threads
    pub fn current_thread_count(&self) -> usize {
        self.shared.inner.lock().registry.len()
    }

    /// Number of workers waiting for work
    pub fn idle_thread_count(&self) -> usize {
        self.shared.inner.lock().registry.idle_count()
    }

    /// Number of workers running a task
    pub fn active_thread_count(&self) -> usize {
        let inner = self.shared.inner.lock();
        inner.registry.len() - inner.registry.idle_count()
    }

    /// Number of tasks waiting in the queue
    pub fn pending_queue_size(&self) -> usize {
        self.shared.inner.lock().queue.len()
    }

    /// Cumulative counters
    pub fn stats(&self) -> &PoolStats {
        &self.shared.stats
    }

    /// Consistent snapshot of the pool
    pub fn status(&self) -> PoolStatus {
        let inner = self.shared.inner.lock();
        let current = inner.registry.len();
        let idle = inner.registry.idle_count();
        let stats = &self.shared.stats;
        PoolStatus {
            pool_id: self.shared.id,
            state: inner.state,
            mode: inner.config.mode,
            rejection_policy: inner.config.rejection_policy,
            current_threads: current,
            idle_threads: idle,
            active_threads: current - idle,
            pending_tasks: inner.queue.len(),
            queue_capacity: inner.queue.capacity(),
            thread_ceiling: inner.config.thread_ceiling,
            tasks_submitted: stats.get_tasks_submitted(),
            tasks_completed: stats.get_tasks_completed(),
            tasks_failed: stats.get_tasks_failed(),
            sampled_at: Utc::now(),
        }
    }

    /// Snapshot of every live worker
    pub fn workers(&self) -> Vec<WorkerInfo> {
        self.shared.inner.lock().registry.snapshot()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        match self.shutdown() {
            Ok(()) => {}
            Err(ThreadError::ShutdownFromWorker { worker_id }) => {
                // Dropped by one of its own tasks: signal the workers and let
                // them drain without waiting here.
                warn!(
                    "pool {} dropped from worker {}; shutting down without waiting",
                    self.shared.id, worker_id
                );
                let mut inner = self.shared.inner.lock();
                if inner.state == PoolState::Running {
                    Self::begin_shutdown(&self.shared, &mut inner);
                }
            }
            Err(e) => error!(
                "[THREAD_POOL ERROR] Failed to shutdown pool {} during drop: {}",
                self.shared.id, e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn fast_config(threads: usize) -> PoolConfig {
        PoolConfig::new(threads)
            .with_submit_timeout(Duration::from_millis(50))
            .with_idle_timeout(Duration::from_millis(100))
    }

    #[test]
    fn test_pool_lifecycle_states() {
        let pool = ThreadPool::new();
        assert_eq!(pool.state(), PoolState::Created);
        assert!(!pool.is_running());

        pool.start(2).expect("Failed to start pool");
        assert_eq!(pool.state(), PoolState::Running);
        assert_eq!(pool.current_thread_count(), 2);

        pool.shutdown().expect("Failed to shutdown pool");
        assert_eq!(pool.state(), PoolState::Stopped);
        assert_eq!(pool.current_thread_count(), 0);
    }

    #[test]
    fn test_start_twice_fails() {
        let pool = ThreadPool::new();
        pool.start(1).unwrap();
        let err = pool.start(1).unwrap_err();
        assert!(matches!(
            err,
            ThreadError::AlreadyStarted {
                state: PoolState::Running
            }
        ));
        pool.shutdown().unwrap();
    }

    #[test]
    fn test_start_validates_config() {
        let pool = ThreadPool::new();
        assert!(matches!(
            pool.start(0),
            Err(ThreadError::InvalidConfig { .. })
        ));
        assert_eq!(pool.state(), PoolState::Created);

        pool.set_queue_capacity(0);
        assert!(pool.start(1).is_err());
    }

    #[test]
    fn test_with_config_validates() {
        assert!(ThreadPool::with_config(PoolConfig::new(0)).is_err());
        assert!(ThreadPool::with_config(PoolConfig::new(2)).is_ok());
    }

    #[test]
    fn test_submit_before_start_is_refused() {
        let pool = ThreadPool::new();
        let err = pool.submit(|| ()).unwrap_err();
        assert!(matches!(
            err,
            ThreadError::PoolNotAccepting {
                state: PoolState::Created
            }
        ));
    }

    #[test]
    fn test_submit_after_shutdown_is_refused() {
        let pool = ThreadPool::new();
        pool.start(1).unwrap();
        pool.shutdown().unwrap();

        let err = pool.submit(|| ()).unwrap_err();
        assert!(matches!(
            err,
            ThreadError::PoolNotAccepting {
                state: PoolState::Stopped
            }
        ));
    }

    #[test]
    fn test_setters_are_noops_after_start() {
        let pool = ThreadPool::new();
        assert!(pool.set_queue_capacity(8));
        assert!(!pool.set_thread_ceiling(4), "ceiling needs elastic mode");
        assert!(pool.set_mode(PoolMode::Elastic));
        assert!(pool.set_thread_ceiling(4));

        pool.start(2).unwrap();
        assert!(!pool.set_mode(PoolMode::Fixed));
        assert!(!pool.set_queue_capacity(100));
        assert!(!pool.set_thread_ceiling(16));

        assert_eq!(pool.mode(), PoolMode::Elastic);
        assert_eq!(pool.queue_capacity(), 8);
        assert_eq!(pool.thread_ceiling(), 4);

        // Rejection policy stays mutable
        pool.set_rejection_policy(RejectionPolicy::Discard);
        assert_eq!(pool.rejection_policy(), RejectionPolicy::Discard);
        pool.shutdown().unwrap();
    }

    #[test]
    fn test_results_are_delivered() {
        let pool = ThreadPool::new();
        pool.start(2).unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| pool.submit(move || i * 2).unwrap())
            .collect();
        let results: Vec<i32> = handles.into_iter().map(|h| h.wait().unwrap()).collect();
        assert_eq!(results, (0..10).map(|i| i * 2).collect::<Vec<_>>());

        pool.shutdown().unwrap();
        assert_eq!(pool.stats().get_tasks_submitted(), 10);
        assert_eq!(pool.stats().get_tasks_completed(), 10);
    }

    #[test]
    fn test_panicking_task_does_not_kill_worker() {
        let pool = ThreadPool::new();
        pool.start(1).unwrap();

        let bad = pool.submit(|| -> u32 { panic!("Intentional panic for testing") }).unwrap();
        let good = pool.submit(|| 5u32).unwrap();

        assert!(matches!(bad.wait(), Err(ThreadError::TaskPanicked { .. })));
        assert_eq!(good.wait().unwrap(), 5);
        assert_eq!(pool.current_thread_count(), 1);

        pool.shutdown().unwrap();
        assert_eq!(pool.stats().get_tasks_failed(), 1);
    }

    #[test]
    fn test_shutdown_drains_queue() {
        let pool = ThreadPool::with_config(fast_config(1)).unwrap();
        pool.start(1).unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                thread::sleep(Duration::from_millis(1));
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        pool.shutdown().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 20);
        assert_eq!(pool.pending_queue_size(), 0);
    }

    #[test]
    fn test_shutdown_before_start() {
        let pool = ThreadPool::new();
        pool.shutdown().unwrap();
        assert_eq!(pool.state(), PoolState::Stopped);
        assert!(pool.start(1).is_err());
    }

    #[test]
    fn test_shutdown_from_worker_is_refused() {
        let pool = Arc::new(ThreadPool::new());
        pool.start(1).unwrap();

        let inner = Arc::clone(&pool);
        let handle = pool.submit(move || inner.shutdown()).unwrap();
        let outcome = handle.wait().unwrap();
        assert!(matches!(
            outcome,
            Err(ThreadError::ShutdownFromWorker { .. })
        ));

        pool.shutdown().unwrap();
    }

    #[test]
    fn test_named_submission_and_custom_job() {
        struct Flag(Arc<AtomicUsize>);
        impl Job for Flag {
            fn execute(self: Box<Self>) -> Result<()> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let pool = ThreadPool::new();
        pool.start(1).unwrap();

        let handle = pool.submit_named(3, "answer", || 42).unwrap();
        assert_eq!(handle.name(), "answer");
        assert_eq!(handle.wait().unwrap(), 42);

        let hits = Arc::new(AtomicUsize::new(0));
        pool.submit_job(1, Flag(Arc::clone(&hits))).unwrap();
        pool.shutdown().unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_status_snapshot() {
        let pool = ThreadPool::with_config(fast_config(2).with_queue_capacity(4)).unwrap();
        pool.start(2).unwrap();

        let status = pool.status();
        assert_eq!(status.pool_id, pool.id());
        assert_eq!(status.state, PoolState::Running);
        assert_eq!(status.current_threads, 2);
        assert_eq!(status.idle_threads + status.active_threads, 2);
        assert_eq!(status.queue_capacity, 4);

        let workers = pool.workers();
        assert_eq!(workers.len(), 2);
        assert!(workers[0].thread_name.starts_with("worker-"));

        pool.shutdown().unwrap();
        assert!(pool.workers().is_empty());
    }

    #[test]
    fn test_drop_shuts_down() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = ThreadPool::new();
            pool.start(2).unwrap();
            for _ in 0..5 {
                let counter = Arc::clone(&counter);
                pool.submit(move || {
                    thread::sleep(Duration::from_millis(5));
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
