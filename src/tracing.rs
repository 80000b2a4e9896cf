//! Tracing integration for observability.
//!
//! The pool always logs through the `log` facade. With the `tracing` feature
//! enabled, workers additionally run inside `worker` and `job_execution`
//! spans and the functions in [`metrics`] emit structured events.
//!
//! # Example
//!
//! ```rust,ignore
//! use rust_priority_pool::prelude::*;
//! use rust_priority_pool::tracing::TracedJob;
//!
//! let pool = ThreadPool::new();
//! pool.start(4)?;
//!
//! let span = tracing::info_span!("request", id = 7);
//! let _entered = span.enter();
//! // Runs on a worker inside the `request` span
//! pool.submit_traced(5, MyJob::new())?;
//! ```

use crate::core::{Job, Result};

/// A job wrapper that carries the submitter's tracing span onto the worker.
///
/// The current span is captured when the wrapper is built and entered when
/// the job executes. Without the `tracing` feature it is a transparent
/// pass-through.
pub struct TracedJob<J: Job> {
    inner: J,
    #[cfg(feature = "tracing")]
    span: tracing::Span,
}

impl<J: Job> TracedJob<J> {
    /// Wraps `job`, capturing the current span
    pub fn new(job: J) -> Self {
        Self {
            inner: job,
            #[cfg(feature = "tracing")]
            span: tracing::Span::current(),
        }
    }

    /// Wraps `job` with an explicit span
    #[cfg(feature = "tracing")]
    pub fn with_span(job: J, span: tracing::Span) -> Self {
        Self { inner: job, span }
    }
}

impl<J: Job> Job for TracedJob<J> {
    fn execute(self: Box<Self>) -> Result<()> {
        let this = *self;
        #[cfg(feature = "tracing")]
        let _guard = this.span.enter();
        Box::new(this.inner).execute()
    }

    fn job_type(&self) -> &str {
        self.inner.job_type()
    }
}

/// Structured events for metrics pipelines.
///
/// Field names follow the `counter.*`, `gauge.*`, `histogram.*` convention
/// understood by tracing-to-metrics bridges.
#[cfg(feature = "tracing")]
pub mod metrics {
    use crate::pool::WorkerId;
    use std::time::Duration;

    /// Records an admitted submission.
    #[inline]
    pub fn record_submission(queue_depth: usize) {
        tracing::trace!(
            counter.tasks_submitted = 1,
            gauge.queue_depth = queue_depth as i64,
            "task submitted"
        );
    }

    /// Records a submission that found the queue full.
    #[inline]
    pub fn record_rejection(policy: &str) {
        tracing::debug!(counter.tasks_rejected = 1, policy = policy, "queue full");
    }

    /// Records task completion with timing.
    #[inline]
    pub fn record_completion(duration: Duration, success: bool) {
        let duration_ms = duration.as_millis() as u64;
        if success {
            tracing::trace!(
                counter.tasks_completed = 1,
                histogram.task_duration_ms = duration_ms,
                "task completed"
            );
        } else {
            tracing::trace!(
                counter.tasks_failed = 1,
                histogram.task_duration_ms = duration_ms,
                "task failed"
            );
        }
    }

    /// Records a task panic.
    #[inline]
    pub fn record_panic(duration: Duration) {
        tracing::trace!(
            counter.tasks_panicked = 1,
            histogram.task_duration_ms = duration.as_millis() as u64,
            "task panicked"
        );
    }

    /// Records a new worker thread.
    #[inline]
    pub fn record_worker_spawned(worker_id: WorkerId) {
        tracing::debug!(gauge.workers = 1, worker_id = worker_id, "worker spawned");
    }

    /// Records a worker leaving the pool.
    #[inline]
    pub fn record_worker_exit(worker_id: WorkerId, reason: &str) {
        tracing::debug!(
            gauge.workers = -1i64,
            worker_id = worker_id,
            reason = reason,
            "worker exited"
        );
    }

    /// Records pool startup.
    #[inline]
    pub fn record_pool_start(num_workers: usize, mode: &str) {
        tracing::info!(workers = num_workers, mode = mode, "thread pool started");
    }

    /// Records pool shutdown.
    #[inline]
    pub fn record_pool_shutdown(tasks_completed: u64, tasks_failed: u64) {
        tracing::info!(
            tasks_completed = tasks_completed,
            tasks_failed = tasks_failed,
            "thread pool shutdown complete"
        );
    }
}
