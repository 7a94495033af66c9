//! Bounded query history.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::domain::foundation::ValidationError;
use crate::domain::vehicle::VehicleQuery;

/// Bounded FIFO of past query signatures, most-recent-first.
///
/// Pushing beyond capacity evicts the oldest entry. Capacity is fixed
/// at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHistory {
    capacity: usize,
    entries: VecDeque<VehicleQuery>,
}

impl QueryHistory {
    /// Creates an empty history, returning error if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ValidationError> {
        if capacity == 0 {
            return Err(ValidationError::out_of_range(
                "history_capacity",
                1.0,
                usize::MAX as f64,
                0.0,
            ));
        }
        Ok(Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        })
    }

    /// Records a query as the most recent entry, evicting the oldest
    /// once the history is full.
    pub fn push(&mut self, query: VehicleQuery) {
        self.entries.push_front(query);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Returns the number of recorded queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates entries most-recent-first.
    pub fn iter(&self) -> impl Iterator<Item = &VehicleQuery> {
        self.entries.iter()
    }

    /// Returns a cloned snapshot, most-recent-first.
    pub fn snapshot(&self) -> Vec<VehicleQuery> {
        self.entries.iter().cloned().collect()
    }
}
