//! Pool configuration

use crate::core::{Result, ThreadError};
use crate::queue::RejectionPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default queue ceiling
pub const DEFAULT_QUEUE_CAPACITY: usize = i32::MAX as usize;
/// Default thread ceiling for elastic pools
pub const DEFAULT_THREAD_CEILING: usize = 1024;
/// Default bound on how long `submit` waits for queue space
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(1);
/// Default idle window after which surplus elastic workers exit
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Thread count policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolMode {
    /// Thread count stays at the value passed to `start`
    #[default]
    Fixed,
    /// Threads are added under load up to the ceiling and reclaimed after
    /// the idle timeout
    Elastic,
}

impl fmt::Display for PoolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => f.write_str("fixed"),
            Self::Elastic => f.write_str("elastic"),
        }
    }
}

impl FromStr for PoolMode {
    type Err = ThreadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "elastic" | "cached" => Ok(Self::Elastic),
            other => Err(ThreadError::invalid_config(
                "mode",
                format!("unknown mode '{}'", other),
            )),
        }
    }
}

/// Configuration for a [`ThreadPool`](crate::ThreadPool)
///
/// Can be built with the `with_*` methods or deserialized from JSON:
///
/// ```rust
/// use rust_priority_pool::prelude::*;
///
/// let config = PoolConfig::from_json(r#"{ "mode": "elastic", "thread_ceiling": 8 }"#).unwrap();
/// assert_eq!(config.mode, PoolMode::Elastic);
/// assert_eq!(config.thread_ceiling, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Fixed or elastic thread count
    pub mode: PoolMode,
    /// Maximum number of pending tasks
    pub queue_capacity: usize,
    /// Upper bound on live threads (elastic mode only)
    pub thread_ceiling: usize,
    /// Policy applied when the queue stays full
    pub rejection_policy: RejectionPolicy,
    /// Threads spawned by `start`; also the elastic reclamation floor
    pub initial_threads: usize,
    /// Worker thread name prefix
    pub thread_name_prefix: String,
    /// Bound on how long `submit` waits for queue space
    pub submit_timeout: Duration,
    /// Idle window before a surplus elastic worker exits
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            mode: PoolMode::Fixed,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            thread_ceiling: DEFAULT_THREAD_CEILING,
            rejection_policy: RejectionPolicy::Abort,
            initial_threads: num_cpus::get(),
            thread_name_prefix: "worker".to_string(),
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the given initial thread count
    #[must_use]
    pub fn new(initial_threads: usize) -> Self {
        Self {
            initial_threads,
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ThreadError::invalid_config("json", e.to_string()))
    }

    /// Set the pool mode
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_mode(mut self, mode: PoolMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set maximum queue size
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the elastic thread ceiling
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_ceiling(mut self, ceiling: usize) -> Self {
        self.thread_ceiling = ceiling;
        self
    }

    /// Set the rejection policy
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rejection_policy(mut self, policy: RejectionPolicy) -> Self {
        self.rejection_policy = policy;
        self
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set how long `submit` waits for queue space before the rejection
    /// policy applies
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// Set the idle window for elastic reclamation.
    ///
    /// # Panics
    ///
    /// Panics if `timeout` is zero.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "idle timeout must be non-zero");
        self.idle_timeout = timeout;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.initial_threads == 0 {
            return Err(ThreadError::invalid_config(
                "initial_threads",
                "Number of threads must be greater than 0",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ThreadError::invalid_config(
                "queue_capacity",
                "Queue capacity must be greater than 0",
            ));
        }
        if self.idle_timeout.is_zero() {
            return Err(ThreadError::invalid_config(
                "idle_timeout",
                "Idle timeout must be non-zero",
            ));
        }
        if self.mode == PoolMode::Elastic {
            if self.thread_ceiling == 0 {
                return Err(ThreadError::invalid_config(
                    "thread_ceiling",
                    "Thread ceiling must be greater than 0",
                ));
            }
            if self.initial_threads > self.thread_ceiling {
                return Err(ThreadError::invalid_config(
                    "initial_threads",
                    format!(
                        "{} initial threads exceed the ceiling of {}",
                        self.initial_threads, self.thread_ceiling
                    ),
                ));
            }
        }
        Ok(())
    }
}
