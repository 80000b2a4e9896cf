//! Job trait, closure jobs, and weighted work items

use crate::core::error::{Result, ThreadError};
use crate::core::handle::{completion_pair, Completer, TaskHandle};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Weight assigned by [`ThreadPool::submit`](crate::ThreadPool::submit)
pub const DEFAULT_WEIGHT: i32 = 0;

/// A type-erased unit of work executed by the pool
///
/// `execute` consumes the job, so a job runs at most once.
pub trait Job: Send {
    /// Execute the job
    ///
    /// # Errors
    ///
    /// Returns an error if the job failed. The error is only logged and
    /// counted by the worker; it never stops the worker.
    fn execute(self: Box<Self>) -> Result<()>;

    /// Get the job's type name for debugging and statistics
    fn job_type(&self) -> &str {
        "Job"
    }
}

impl fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job({})", self.job_type())
    }
}

/// A boxed job that can be sent across threads
pub type BoxedJob = Box<dyn Job>;

/// A closure paired with the completer of its [`TaskHandle`]
///
/// Panics raised by the closure are caught and delivered to the handle as
/// [`ThreadError::TaskPanicked`].
pub struct ClosureJob<T, F>
where
    F: FnOnce() -> T + Send,
{
    closure: F,
    completer: Completer<T>,
    name: String,
}

impl<T, F> ClosureJob<T, F>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    /// Wraps `closure` and returns the handle its result will be delivered to
    pub fn new(closure: F) -> (Self, TaskHandle<T>) {
        Self::with_name(closure, "ClosureJob")
    }

    /// Same as [`ClosureJob::new`] with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> (Self, TaskHandle<T>) {
        let name = name.into();
        let (completer, handle) = completion_pair(name.clone());
        (
            Self {
                closure,
                completer,
                name,
            },
            handle,
        )
    }
}

impl<T, F> Job for ClosureJob<T, F>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    fn execute(self: Box<Self>) -> Result<()> {
        let ClosureJob {
            closure, completer, ..
        } = *self;

        match catch_unwind(AssertUnwindSafe(closure)) {
            Ok(value) => {
                completer.complete(Ok(value));
                Ok(())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                completer.complete(Err(ThreadError::task_panicked(message.clone())));
                Err(ThreadError::task_panicked(message))
            }
        }
    }

    fn job_type(&self) -> &str {
        &self.name
    }
}

/// Renders a panic payload as text
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// A job together with its scheduling weight
///
/// Items compare by weight alone. Two items with the same weight are equal
/// for ordering purposes, so their relative execution order is unspecified.
pub struct WorkItem {
    weight: i32,
    job: BoxedJob,
}

impl WorkItem {
    /// Create a new work item
    pub fn new(weight: i32, job: BoxedJob) -> Self {
        Self { weight, job }
    }

    /// Scheduling weight (higher runs first)
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Type name of the wrapped job
    pub fn job_type(&self) -> &str {
        self.job.job_type()
    }

    /// Runs the job on the current thread.
    ///
    /// A panic escaping the job is converted into
    /// [`ThreadError::TaskPanicked`] so the calling thread survives.
    pub fn run(self) -> Result<()> {
        let job = self.job;
        match catch_unwind(AssertUnwindSafe(move || job.execute())) {
            Ok(result) => result,
            Err(payload) => Err(ThreadError::task_panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("weight", &self.weight)
            .field("job", &self.job.job_type())
            .finish()
    }
}

impl PartialEq for WorkItem {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

impl Eq for WorkItem {}

impl PartialOrd for WorkItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WorkItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight.cmp(&other.weight)
    }
}
