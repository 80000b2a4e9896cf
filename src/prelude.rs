//! Convenient re-exports for common types and traits

pub use crate::core::{
    BoxedJob, ClosureJob, Job, Result, TaskHandle, ThreadError, DEFAULT_WEIGHT,
};
pub use crate::pool::{
    PoolConfig, PoolMode, PoolState, PoolStats, PoolStatus, ThreadPool, WorkerInfo, WorkerState,
};
pub use crate::queue::RejectionPolicy;
