//! Completion handles
//!
//! Every submitted task is paired with a single-slot result cell. The pool
//! keeps the producing half ([`Completer`]) inside the work item and hands the
//! consuming half ([`TaskHandle`]) back to the submitter.
//!
//! A completer that is dropped without being fulfilled marks the slot as
//! discarded, so a caller blocked in [`TaskHandle::wait`] wakes up with
//! [`ThreadError::TaskDiscarded`] instead of waiting forever.
//!
//! # Example
//!
//! ```rust
//! use rust_priority_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::new();
//! pool.start(2)?;
//!
//! let handle = pool.submit(|| 6 * 7)?;
//! assert_eq!(handle.wait()?, 42);
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```

use crate::core::error::{Result, ThreadError};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

enum SlotState<T> {
    Pending,
    Ready(Result<T>),
    Discarded,
    Taken,
}

struct Slot<T> {
    state: Mutex<SlotState<T>>,
    filled: Condvar,
}

impl<T> Slot<T> {
    fn settle(&self, next: SlotState<T>) {
        let mut state = self.state.lock();
        if matches!(*state, SlotState::Pending) {
            *state = next;
            self.filled.notify_all();
        }
    }
}

/// Creates a connected completer / handle pair for a task called `name`.
pub fn completion_pair<T>(name: impl Into<String>) -> (Completer<T>, TaskHandle<T>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState::Pending),
        filled: Condvar::new(),
    });
    (
        Completer {
            slot: Some(Arc::clone(&slot)),
        },
        TaskHandle {
            slot,
            name: name.into(),
        },
    )
}

/// Producer side of a completion handle.
///
/// Fulfilled at most once. Dropping an unfulfilled completer discards the
/// task.
pub struct Completer<T> {
    slot: Option<Arc<Slot<T>>>,
}

impl<T> Completer<T> {
    /// Stores the task outcome and wakes every waiter.
    pub fn complete(mut self, result: Result<T>) {
        if let Some(slot) = self.slot.take() {
            slot.settle(SlotState::Ready(result));
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.settle(SlotState::Discarded);
        }
    }
}

impl<T> fmt::Debug for Completer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("fulfilled", &self.slot.is_none())
            .finish()
    }
}

/// Consumer side of a completion handle, returned by every submission.
///
/// The result can be taken exactly once. After that, further reads return
/// an [`ThreadError::Other`] error.
pub struct TaskHandle<T> {
    slot: Arc<Slot<T>>,
    name: String,
}

impl<T> TaskHandle<T> {
    /// Name of the task this handle belongs to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blocks until the task has run (or was discarded) and returns its
    /// outcome.
    pub fn wait(self) -> Result<T> {
        let mut state = self.slot.state.lock();
        while matches!(*state, SlotState::Pending) {
            self.slot.filled.wait(&mut state);
        }
        take(&mut state)
    }

    /// Blocks for at most `timeout`.
    ///
    /// Returns [`ThreadError::WaitTimeout`] if the task has not finished yet;
    /// the handle stays usable in that case.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Result<T> {
        let mut state = self.slot.state.lock();
        self.slot
            .filled
            .wait_while_for(&mut state, |s| matches!(s, SlotState::Pending), timeout);
        if matches!(*state, SlotState::Pending) {
            return Err(ThreadError::wait_timeout(timeout.as_millis() as u64));
        }
        take(&mut state)
    }

    /// Returns the outcome if it is available, without blocking.
    pub fn try_get(&mut self) -> Option<Result<T>> {
        let mut state = self.slot.state.lock();
        if matches!(*state, SlotState::Pending) {
            return None;
        }
        Some(take(&mut state))
    }

    /// Whether the task has produced a value or failure that has not been
    /// taken yet
    pub fn is_ready(&self) -> bool {
        matches!(*self.slot.state.lock(), SlotState::Ready(_))
    }

    /// Whether the task was dropped without running
    pub fn is_discarded(&self) -> bool {
        matches!(*self.slot.state.lock(), SlotState::Discarded)
    }
}

fn take<T>(state: &mut SlotState<T>) -> Result<T> {
    match std::mem::replace(state, SlotState::Taken) {
        SlotState::Ready(result) => result,
        SlotState::Discarded => {
            *state = SlotState::Discarded;
            Err(ThreadError::TaskDiscarded)
        }
        SlotState::Taken => Err(ThreadError::other("task result was already taken")),
        SlotState::Pending => {
            *state = SlotState::Pending;
            Err(ThreadError::other("task result is not ready"))
        }
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *self.slot.state.lock() {
            SlotState::Pending => "pending",
            SlotState::Ready(_) => "ready",
            SlotState::Discarded => "discarded",
            SlotState::Taken => "taken",
        };
        f.debug_struct("TaskHandle")
            .field("name", &self.name)
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_complete_then_wait() {
        let (completer, handle) = completion_pair::<u32>("answer");
        assert!(!handle.is_ready());

        completer.complete(Ok(42));
        assert!(handle.is_ready());
        assert_eq!(handle.name(), "answer");
        assert_eq!(handle.wait().unwrap(), 42);
    }

    #[test]
    fn test_wait_wakes_on_completion_from_other_thread() {
        let (completer, handle) = completion_pair::<String>("remote");

        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            completer.complete(Ok("done".to_string()));
        });

        assert_eq!(handle.wait().unwrap(), "done");
        producer.join().unwrap();
    }

    #[test]
    fn test_dropped_completer_discards() {
        let (completer, mut handle) = completion_pair::<()>("dropped");
        drop(completer);

        assert!(handle.is_discarded());
        assert!(!handle.is_ready());
        assert!(matches!(
            handle.try_get(),
            Some(Err(ThreadError::TaskDiscarded))
        ));
        // Discarded is sticky
        assert!(matches!(handle.wait(), Err(ThreadError::TaskDiscarded)));
    }

    #[test]
    fn test_wait_timeout_keeps_handle_usable() {
        let (completer, mut handle) = completion_pair::<i32>("slow");

        let err = handle.wait_timeout(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, ThreadError::WaitTimeout { timeout_ms: 10 }));
        assert!(handle.try_get().is_none());

        completer.complete(Ok(7));
        assert_eq!(handle.wait_timeout(Duration::from_millis(10)).unwrap(), 7);

        // Value can only be taken once
        assert!(matches!(handle.try_get(), Some(Err(ThreadError::Other(_)))));
    }

    #[test]
    fn test_failure_is_delivered() {
        let (completer, handle) = completion_pair::<i32>("failing");
        completer.complete(Err(ThreadError::task_panicked("boom")));

        match handle.wait() {
            Err(ThreadError::TaskPanicked { message }) => assert_eq!(message, "boom"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
