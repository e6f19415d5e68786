//! Priority keys for the FCFS simulation.
//!
//! Both keys derive `Ord` lexicographically over their fields, so the
//! field order *is* the tie-break order. They are stored in
//! `BinaryHeap<Reverse<_>>` to pop the minimum first.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// An operation that has arrived at a machine and waits to be dispatched.
///
/// Ordered by `(arrival, job_id, op_index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct WaitingOp {
    pub arrival: i64,
    pub job_id: usize,
    pub op_index: usize,
}

/// A future operation completion.
///
/// Ordered by `(end, machine_id, job_id, op_index)`; `start` never takes
/// part in a tie because `(machine_id, job_id, op_index)` is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct CompletionEvent {
    pub end: i64,
    pub machine_id: usize,
    pub job_id: usize,
    pub op_index: usize,
    pub start: i64,
}

/// Min-heap wrapper.
#[derive(Debug, Clone)]
pub(crate) struct MinQueue<T: Ord>(BinaryHeap<Reverse<T>>);

impl<T: Ord> MinQueue<T> {
    pub fn new() -> Self {
        Self(BinaryHeap::new())
    }

    pub fn push(&mut self, item: T) {
        self.0.push(Reverse(item));
    }

    pub fn pop(&mut self) -> Option<T> {
        self.0.pop().map(|Reverse(item)| item)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<T: Ord> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
