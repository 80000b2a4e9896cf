//! Thread pool, its configuration, and worker bookkeeping

pub mod config;
pub mod registry;
pub mod stats;
pub mod thread_pool;
mod worker;

pub use config::{
    PoolConfig, PoolMode, DEFAULT_IDLE_TIMEOUT, DEFAULT_QUEUE_CAPACITY, DEFAULT_SUBMIT_TIMEOUT,
    DEFAULT_THREAD_CEILING,
};
pub use registry::{WorkerId, WorkerInfo, WorkerRegistry, WorkerState};
pub use stats::{PoolStats, PoolStatus};
pub use thread_pool::{PoolState, ThreadPool};
