//! Suspension ledger
//!
//! Tracks which pids are currently suspended by this engine. Entries are
//! added only on a successful suspend and removed only on a successful
//! resume, so the ledger is the authoritative record of what must be
//! restored at session end.

use std::collections::BTreeSet;

/// Set of pids currently suspended by this engine
#[derive(Debug, Default)]
pub struct Ledger {
    pids: BTreeSet<u32>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pid. Returns false if it was already tracked, guarding
    /// against double-counting a re-suspended process.
    pub fn insert(&mut self, pid: u32) -> bool {
        self.pids.insert(pid)
    }

    /// Remove a pid after a successful resume. Returns false if it was not
    /// tracked.
    pub fn remove(&mut self, pid: u32) -> bool {
        self.pids.remove(&pid)
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.pids.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    /// Snapshot of tracked pids, for iterating while the ledger is mutated
    pub fn pids(&self) -> Vec<u32> {
        self.pids.iter().copied().collect()
    }
}
