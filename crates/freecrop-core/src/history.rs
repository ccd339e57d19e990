//! Bounded undo history.

use std::collections::VecDeque;

/// Default number of snapshots kept by an [`UndoStack`].
pub const DEFAULT_UNDO_CAPACITY: usize = 10;

/// A stack of snapshots that evicts its oldest entry once full.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoStack<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> UndoStack<T> {
    /// Create a stack holding at most `capacity` snapshots.
    ///
    /// A capacity of zero disables undo: every push is dropped.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a snapshot, returning the evicted oldest entry if the stack was full.
    pub fn push(&mut self, snapshot: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(snapshot);
        }
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(snapshot);
        evicted
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_UNDO_CAPACITY)
    }
}
