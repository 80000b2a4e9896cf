//! Task queue and backpressure.
//!
//! - [`BoundedPriorityQueue`]: the max-weight heap holding pending work
//! - [`RejectionPolicy`]: what a submission does when the queue stays full

mod priority;
mod rejection;

pub use priority::BoundedPriorityQueue;
pub use rejection::RejectionPolicy;
