use crate::core::quote::{QuoteKind, QuoteSnapshot};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Rolling window of the most recent snapshots, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<QuoteSnapshot>,
    capacity: usize,
}

impl HistoryBuffer {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a snapshot, evicting the oldest entries so that the buffer never
    /// holds more than `capacity` items.
    pub fn append(&mut self, snapshot: QuoteSnapshot) {
        while self.entries.len() >= self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(timestamp = %evicted.timestamp(), "Evicting oldest history entry");
            }
        }
        self.entries.push_back(snapshot);
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &QuoteSnapshot> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&QuoteSnapshot> {
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

    /// Sell prices for `kind` over time, ready to be charted.
    pub fn sell_series(&self, kind: QuoteKind) -> Vec<(DateTime<Utc>, Option<f64>)> {
        self.entries
            .iter()
            .map(|snapshot| (snapshot.timestamp(), snapshot.quote(kind).sell))
            .collect()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
