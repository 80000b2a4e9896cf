//! Bounded max-weight queue of pending work items.

use crate::core::WorkItem;
use std::collections::BinaryHeap;

/// Pending work ordered by weight, with a capacity ceiling.
///
/// The queue itself is not synchronized: the pool only touches it while
/// holding its coordination lock, and blocking for space or items is done
/// with the pool's condition variables.
///
/// # Example
///
/// ```rust
/// use rust_priority_pool::core::{ClosureJob, WorkItem};
/// use rust_priority_pool::queue::BoundedPriorityQueue;
///
/// let mut queue = BoundedPriorityQueue::new(2);
/// queue.push(WorkItem::new(1, Box::new(ClosureJob::new(|| ()).0))).unwrap();
/// queue.push(WorkItem::new(9, Box::new(ClosureJob::new(|| ()).0))).unwrap();
///
/// // Full: the item is handed back
/// assert!(queue.push(WorkItem::new(5, Box::new(ClosureJob::new(|| ()).0))).is_err());
///
/// assert_eq!(queue.pop_highest().unwrap().weight(), 9);
/// ```
#[derive(Debug)]
pub struct BoundedPriorityQueue {
    heap: BinaryHeap<WorkItem>,
    capacity: usize,
}

impl BoundedPriorityQueue {
    /// Creates an empty queue that admits at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            capacity,
        }
    }

    /// Admits `item` if there is room, otherwise returns it to the caller.
    pub fn push(&mut self, item: WorkItem) -> std::result::Result<(), WorkItem> {
        if self.is_full() {
            return Err(item);
        }
        self.heap.push(item);
        Ok(())
    }

    /// Removes the item with the greatest weight.
    pub fn pop_highest(&mut self) -> Option<WorkItem> {
        self.heap.pop()
    }

    /// Weight of the item `pop_highest` would return
    pub fn peek_weight(&self) -> Option<i32> {
        self.heap.peek().map(WorkItem::weight)
    }

    /// Number of pending items
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no items are pending
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether a `push` would be refused
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Maximum number of pending items
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the ceiling. Items already admitted are kept even when the
    /// new capacity is smaller.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }
}
