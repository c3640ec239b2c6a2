//! Fixed-depth trail of agent snapshots.
//!
//! The ring keeps the most recent [`HISTORY_CAPACITY`] snapshots in
//! chronological order. Recording into a full ring evicts the oldest entry.
//! Only the renderer reads the trail; the simulation never looks back at it.

use std::collections::VecDeque;

use pursuit_types::AgentSnapshot;

/// Number of snapshots kept per agent.
pub const HISTORY_CAPACITY: usize = 10;

/// Bounded FIFO of [`AgentSnapshot`]s, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRing {
    /// Snapshots, front = oldest.
    entries: VecDeque<AgentSnapshot>,
    /// Maximum number of entries.
    capacity: usize,
}

impl HistoryRing {
    /// Create an empty ring holding [`HISTORY_CAPACITY`] snapshots.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty ring with a custom capacity (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `snapshot`, evicting the oldest entry if the ring is full.
    pub fn record(&mut self, snapshot: AgentSnapshot) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of stored snapshots.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent snapshot.
    pub fn latest(&self) -> Option<&AgentSnapshot> {
        self.entries.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.entries.iter()
    }

    /// Copy the trail out, oldest first.
    pub fn to_vec(&self) -> Vec<AgentSnapshot> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new()
    }
}
