//! Priority queue for BPE merge candidates.
//!
//! The queue never holds authoritative counts. Every time a pair's count
//! changes a fresh candidate is pushed, and `pop_live` discards candidates
//! whose count no longer matches the caller's source of truth.

use crate::core::merges::Pair;
use dary_heap::OctonaryHeap;
use std::cmp::Ordering;

/// A merge candidate during BPE training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeCandidate {
    /// The pair of token IDs to merge
    pub pair: Pair,
    /// The frequency/count of this pair
    pub count: u64,
}

impl MergeCandidate {
    /// Create a new merge candidate.
    pub fn new(pair: Pair, count: u64) -> Self {
        Self { pair, count }
    }
}

/// Higher count wins; equal counts go to the lexicographically smaller pair.
impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.pair.cmp(&self.pair))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue for BPE merge operations.
///
/// Uses an 8-ary heap for better cache locality than a binary heap.
#[derive(Debug, Default)]
pub struct PairPriorityQueue {
    heap: OctonaryHeap<MergeCandidate>,
}

impl PairPriorityQueue {
    /// Create a new priority queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
        }
    }

    /// Create a new empty priority queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a merge candidate onto the queue.
    pub fn push(&mut self, candidate: MergeCandidate) {
        self.heap.push(candidate);
    }

    /// Record a new count for a pair; zero counts are not queued.
    pub fn update(&mut self, pair: Pair, count: u64) {
        if count > 0 {
            self.heap.push(MergeCandidate::new(pair, count));
        }
    }

    /// Pop the best candidate whose count still matches `current(pair)`.
    ///
    /// Stale entries are dropped. The returned candidate is removed; push it
    /// back if it is not consumed.
    pub fn pop_live<F>(&mut self, mut current: F) -> Option<MergeCandidate>
    where
        F: FnMut(Pair) -> u64,
    {
        while let Some(candidate) = self.heap.pop() {
            if current(candidate.pair) == candidate.count {
                return Some(candidate);
            }
        }
        None
    }

    /// Get the number of (potentially stale) entries in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Clear all entries from the queue.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl Extend<MergeCandidate> for PairPriorityQueue {
    fn extend<I: IntoIterator<Item = MergeCandidate>>(&mut self, iter: I) {
        for candidate in iter {
            self.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    #[test]
    fn test_push_pop() {
        let mut queue = PairPriorityQueue::new();

        queue.push(MergeCandidate::new((0, 1), 10));
        queue.push(MergeCandidate::new((1, 2), 20));
        queue.push(MergeCandidate::new((2, 3), 15));

        let counts: AHashMap<Pair, u64> = [((0, 1), 10), ((1, 2), 20), ((2, 3), 15)]
            .into_iter()
            .collect();
        let current = |pair: Pair| counts.get(&pair).copied().unwrap_or(0);

        assert_eq!(queue.pop_live(current).map(|c| c.pair), Some((1, 2)));
        assert_eq!(queue.pop_live(current).map(|c| c.pair), Some((2, 3)));
        assert_eq!(queue.pop_live(current).map(|c| c.pair), Some((0, 1)));
        assert!(queue.pop_live(current).is_none());
    }

    #[test]
    fn test_tie_break_prefers_smaller_pair() {
        let mut queue = PairPriorityQueue::new();

        queue.push(MergeCandidate::new((256, 97), 2));
        queue.push(MergeCandidate::new((97, 98), 2));
        queue.push(MergeCandidate::new((97, 99), 2));

        let first = queue.pop_live(|_| 2).unwrap();
        assert_eq!(first.pair, (97, 98));
        let second = queue.pop_live(|_| 2).unwrap();
        assert_eq!(second.pair, (97, 99));
    }

    #[test]
    fn test_stale_entry_detection() {
        let mut queue = PairPriorityQueue::new();
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();

        counts.insert((0, 1), 10);
        queue.update((0, 1), 10);
        counts.insert((1, 2), 20);
        queue.update((1, 2), 20);

        // Lower the count of (1, 2); its first entry is now stale.
        counts.insert((1, 2), 5);
        queue.update((1, 2), 5);

        let current = |pair: Pair| counts.get(&pair).copied().unwrap_or(0);

        let first = queue.pop_live(current).unwrap();
        assert_eq!(first, MergeCandidate::new((0, 1), 10));

        let second = queue.pop_live(current).unwrap();
        assert_eq!(second, MergeCandidate::new((1, 2), 5));

        assert!(queue.pop_live(current).is_none());
    }

    #[test]
    fn test_zero_counts_are_not_queued() {
        let mut queue = PairPriorityQueue::new();
        queue.update((0, 1), 0);
        assert!(queue.is_empty());

        queue.extend([MergeCandidate::new((0, 1), 1), MergeCandidate::new((1, 2), 3)]);
        assert_eq!(queue.len(), 2);

        queue.clear();
        assert!(queue.is_empty());
    }
}
