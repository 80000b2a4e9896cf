//! Core types and traits for the priority pool

pub mod error;
pub mod handle;
pub mod job;

pub use error::{Result, ThreadError};
pub use handle::{completion_pair, Completer, TaskHandle};
pub use job::{BoxedJob, ClosureJob, Job, WorkItem, DEFAULT_WEIGHT};
