//! # Rust Priority Pool
//!
//! A bounded, priority-scheduled worker thread pool.
//!
//! ## Features
//!
//! - **Priority Scheduling**: Pending tasks are ordered by an integer weight;
//!   the heaviest pending task always runs next
//! - **Bounded Queue**: Submitters wait a bounded time for space, then a
//!   [`RejectionPolicy`] decides: abort, discard, or run in the caller
//! - **Fixed or Elastic**: A constant worker count, or workers added under
//!   load up to a ceiling and reclaimed after an idle timeout
//! - **Result Handles**: Every closure submission returns a [`TaskHandle`]
//! - **Graceful Shutdown**: Shutdown drains the queue and waits for every
//!   worker; dropping the pool does the same
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_priority_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::new();
//! pool.start(4)?;
//!
//! let handles: Vec<_> = (0..10)
//!     .map(|i| pool.submit_with_priority(i, move || i * i))
//!     .collect::<Result<_>>()?;
//!
//! for handle in handles {
//!     println!("result: {}", handle.wait()?);
//! }
//!
//! pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Elastic Pools
//!
//! ```rust
//! use rust_priority_pool::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! let config = PoolConfig::new(2)
//!     .with_mode(PoolMode::Elastic)
//!     .with_thread_ceiling(8)
//!     .with_queue_capacity(64)
//!     .with_idle_timeout(Duration::from_secs(10))
//!     .with_rejection_policy(RejectionPolicy::RunInCaller);
//!
//! let pool = ThreadPool::with_config(config)?;
//! pool.start(2)?;
//! assert!(pool.current_thread_count() >= 2);
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Jobs
//!
//! ```rust
//! use rust_priority_pool::prelude::*;
//!
//! struct Flush {
//!     target: String,
//! }
//!
//! impl Job for Flush {
//!     fn execute(self: Box<Self>) -> Result<()> {
//!         println!("flushing {}", self.target);
//!         Ok(())
//!     }
//!
//!     fn job_type(&self) -> &str {
//!         "Flush"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = ThreadPool::new();
//! # pool.start(1)?;
//! pool.submit_job(100, Flush {
//!     target: "journal".to_string(),
//! })?;
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Status
//!
//! ```rust
//! use rust_priority_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! # let pool = ThreadPool::new();
//! # pool.start(2)?;
//! let status = pool.status();
//! println!("{} threads, {} pending", status.current_threads, status.pending_tasks);
//! println!("{}", status.to_json());
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
pub mod tracing;

pub use crate::core::{BoxedJob, ClosureJob, Job, Result, TaskHandle, ThreadError, WorkItem};
pub use crate::pool::{PoolConfig, PoolMode, PoolState, PoolStats, PoolStatus, ThreadPool};
pub use crate::queue::RejectionPolicy;
