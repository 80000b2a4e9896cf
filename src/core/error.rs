//! Error types for the priority pool

use crate::pool::PoolState;

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, ThreadError>;

/// Errors that can occur in the pool
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ThreadError {
    /// The pool is not in the `Running` state and refuses new work
    #[error("Pool is not accepting work (state: {state})")]
    PoolNotAccepting {
        /// Lifecycle state observed at submission time
        state: PoolState,
    },

    /// The queue stayed full for the whole submission wait and the
    /// rejection policy is `Abort`
    #[error("Task queue is full ({capacity} slots), submission rejected after {waited_ms}ms")]
    SubmissionRejected {
        /// Configured queue capacity
        capacity: usize,
        /// How long the submitter waited for space
        waited_ms: u64,
    },

    /// The task payload panicked while executing
    #[error("Task panicked: {message}")]
    TaskPanicked {
        /// Panic payload rendered as text
        message: String,
    },

    /// The task was dropped without ever being executed
    #[error("Task was discarded before execution")]
    TaskDiscarded,

    /// A timed wait on a task handle elapsed
    #[error("Task result not ready after {timeout_ms}ms")]
    WaitTimeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// `start` was called on a pool that is not in the `Created` state
    #[error("Pool cannot be started (state: {state})")]
    AlreadyStarted {
        /// Lifecycle state observed at the call
        state: PoolState,
    },

    /// `shutdown` was called from one of the pool's own workers
    #[error("Cannot shut down the pool from its own worker #{worker_id}")]
    ShutdownFromWorker {
        /// Identity of the calling worker
        worker_id: u64,
    },

    /// Failed to spawn a worker thread
    #[error("Failed to spawn worker thread #{worker_id}: {message}")]
    SpawnError {
        /// Identity the worker was registered under
        worker_id: u64,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// General error
    #[error("{0}")]
    Other(String),
}

impl ThreadError {
    /// Create a not accepting error
    pub fn not_accepting(state: PoolState) -> Self {
        ThreadError::PoolNotAccepting { state }
    }

    /// Create a submission rejected error
    pub fn rejected(capacity: usize, waited_ms: u64) -> Self {
        ThreadError::SubmissionRejected {
            capacity,
            waited_ms,
        }
    }

    /// Create a task panicked error
    pub fn task_panicked(message: impl Into<String>) -> Self {
        ThreadError::TaskPanicked {
            message: message.into(),
        }
    }

    /// Create a wait timeout error
    pub fn wait_timeout(timeout_ms: u64) -> Self {
        ThreadError::WaitTimeout { timeout_ms }
    }

    /// Create an already started error
    pub fn already_started(state: PoolState) -> Self {
        ThreadError::AlreadyStarted { state }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(
        worker_id: u64,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        ThreadError::SpawnError {
            worker_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ThreadError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ThreadError::Other(msg.into())
    }

    /// Whether the error was raised at the submission boundary rather than
    /// by the task itself
    pub fn is_submission_error(&self) -> bool {
        matches!(
            self,
            ThreadError::PoolNotAccepting { .. } | ThreadError::SubmissionRejected { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ThreadError::not_accepting(PoolState::ShuttingDown);
        assert!(matches!(err, ThreadError::PoolNotAccepting { .. }));
        assert!(err.is_submission_error());

        let err = ThreadError::rejected(1, 1000);
        assert!(matches!(err, ThreadError::SubmissionRejected { .. }));
        assert!(err.is_submission_error());

        let err = ThreadError::task_panicked("boom");
        assert!(!err.is_submission_error());
    }

    #[test]
    fn test_error_display() {
        let err = ThreadError::rejected(1, 1000);
        assert_eq!(
            err.to_string(),
            "Task queue is full (1 slots), submission rejected after 1000ms"
        );

        let err = ThreadError::not_accepting(PoolState::Stopped);
        assert_eq!(err.to_string(), "Pool is not accepting work (state: stopped)");

        let err = ThreadError::wait_timeout(250);
        assert_eq!(err.to_string(), "Task result not ready after 250ms");
    }

    #[test]
    fn test_spawn_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "no threads left");
        let err = ThreadError::spawn_with_source(5, "Cannot create thread", io_err);

        assert!(matches!(err, ThreadError::SpawnError { .. }));
        assert!(err.to_string().contains("worker thread #5"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
