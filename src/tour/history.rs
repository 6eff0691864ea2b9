//! Bounded undo log.

use std::collections::VecDeque;

use crate::error::{TourError, TourResult};
use crate::tour::state::HistorySnapshot;

/// Default number of undo steps retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// LIFO stack of tour snapshots; the oldest entry is dropped on overflow.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<HistorySnapshot>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStack {
    /// Create a stack holding at most `capacity` snapshots (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a snapshot, evicting the oldest when over capacity.
    pub fn push(&mut self, snapshot: HistorySnapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<HistorySnapshot> {
        self.entries.pop_back()
    }

    /// Like [`HistoryStack::pop`], reporting an empty stack as an error.
    ///
    /// # Errors
    ///
    /// Returns `EmptyHistory` when no snapshot is available.
    pub fn pop_or_err(&mut self) -> TourResult<HistorySnapshot> {
        self.pop().ok_or(TourError::EmptyHistory)
    }

    /// Most recent snapshot without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&HistorySnapshot> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// External reset.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
