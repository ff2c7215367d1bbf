//! Search-progress node counting.
//!
//! One committed total shared by every contributor, plus per-branch tallies
//! for speculative work. Parallel search explores branches that may be
//! abandoned when a cutoff is found elsewhere; summing every contribution as
//! it happens would double-count that abandoned work, so a branch buffers
//! its nodes locally and merges them only once the branch is known to stand.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Node-count aggregator for one search at a time.
///
/// Owned by the search coordinator for the duration of a search and read
/// for reporting afterwards. Committed totals are monotonically
/// non-decreasing between resets.
pub struct NodeCounter {
    committed: AtomicU64,
    deterministic: AtomicBool,
}

impl NodeCounter {
    #[must_use]
    pub fn new() -> Self {
        NodeCounter {
            committed: AtomicU64::new(0),
            deterministic: AtomicBool::new(false),
        }
    }

    /// Commit `delta` nodes directly. Safe from any number of contributors;
    /// the combine is associative and order-independent.
    #[inline]
    pub fn add(&self, delta: u64) {
        self.committed.fetch_add(delta, Ordering::Relaxed);
    }

    /// Point-in-time committed total.
    #[inline]
    #[must_use]
    pub fn total(&self) -> u64 {
        self.committed.load(Ordering::Relaxed)
    }

    /// Clear between searches.
    pub fn reset(&self) {
        self.committed.store(0, Ordering::Relaxed);
    }

    /// Open a speculative tally for one search branch.
    #[must_use]
    pub fn tally(&self) -> BranchTally<'_> {
        BranchTally { counter: self, pending: 0 }
    }

    /// When set, search code must not fan out speculatively, so committed
    /// counts are reproducible run to run.
    pub fn set_deterministic(&self, on: bool) {
        self.deterministic.store(on, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.deterministic.load(Ordering::Relaxed)
    }
}

impl Default for NodeCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// In-flight node count for a single search branch.
///
/// `commit` merges the buffered count into the shared total; dropping the
/// tally without committing discards it, which is exactly what an abandoned
/// speculative branch wants.
pub struct BranchTally<'a> {
    counter: &'a NodeCounter,
    pending: u64,
}

impl BranchTally<'_> {
    #[inline]
    pub fn add(&mut self, delta: u64) {
        self.pending += delta;
    }

    /// Nodes buffered so far, not yet part of the committed total.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.pending
    }

    /// Merge this branch's nodes into the committed total.
    pub fn commit(self) {
        self.counter.add(self.pending);
    }
}
