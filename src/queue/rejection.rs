//! Rejection policies for a full task queue.
//!
//! A submission first waits a bounded amount of time for queue space. If the
//! queue is still full when that wait ends, the pool applies the configured
//! [`RejectionPolicy`]:
//!
//! - [`RejectionPolicy::Abort`]: fail the submission with
//!   [`ThreadError::SubmissionRejected`](crate::ThreadError::SubmissionRejected) (default)
//! - [`RejectionPolicy::Discard`]: drop the task; its handle resolves to
//!   [`ThreadError::TaskDiscarded`](crate::ThreadError::TaskDiscarded)
//! - [`RejectionPolicy::RunInCaller`]: run the task on the submitting thread
//!   before `submit` returns
//!
//! # Example
//!
//! ```rust
//! use rust_priority_pool::prelude::*;
//!
//! let pool = ThreadPool::new();
//! pool.set_rejection_policy(RejectionPolicy::RunInCaller);
//! assert_eq!(pool.rejection_policy(), RejectionPolicy::RunInCaller);
//! ```

use crate::core::ThreadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens to a submission whose queue stayed full for the whole wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Fail the submission with an explicit error.
    #[default]
    Abort,

    /// Drop the task. The caller still receives a handle, which reports the
    /// task as discarded.
    Discard,

    /// Execute the task synchronously on the submitting thread.
    RunInCaller,
}

impl RejectionPolicy {
    /// Stable lowercase name, as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Discard => "discard",
            Self::RunInCaller => "run_in_caller",
        }
    }
}

impl fmt::Display for RejectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RejectionPolicy {
    type Err = ThreadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "discard" => Ok(Self::Discard),
            "run_in_caller" | "runincaller" | "caller_runs" => Ok(Self::RunInCaller),
            other => Err(ThreadError::invalid_config(
                "rejection_policy",
                format!("unknown policy '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_abort() {
        assert_eq!(RejectionPolicy::default(), RejectionPolicy::Abort);
    }

    #[test]
    fn test_parse_and_display() {
        for policy in [
            RejectionPolicy::Abort,
            RejectionPolicy::Discard,
            RejectionPolicy::RunInCaller,
        ] {
            assert_eq!(policy.to_string().parse::<RejectionPolicy>().unwrap(), policy);
        }
        assert_eq!(
            "CallER_RUNS".parse::<RejectionPolicy>().unwrap(),
            RejectionPolicy::RunInCaller
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "drop_oldest".parse::<RejectionPolicy>().unwrap_err();
        assert!(matches!(err, ThreadError::InvalidConfig { .. }));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&RejectionPolicy::RunInCaller).unwrap();
        assert_eq!(json, "\"run_in_caller\"");
    }
}
