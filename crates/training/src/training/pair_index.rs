//! Incrementally maintained pair index.
//!
//! For every adjacent pair in the token sequence the index records the set
//! of positions (the arena index of the pair's left node) where it occurs.
//! A pair's count is the size of that set, so counts and positions cannot
//! drift apart.

use ahash::{AHashMap, AHashSet};
use bytemerge_core::Pair;
use rayon::prelude::*;

/// Sequences shorter than this are always indexed on one thread.
pub const MIN_PARALLEL_LEN: usize = 1 << 16;

type Positions = AHashMap<Pair, AHashSet<usize>>;

/// Options for the bulk index build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIndexOptions {
    /// Whether to partition the build across rayon threads.
    pub parallel: bool,
}

impl Default for PairIndexOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Live pair counts and occurrence positions.
#[derive(Debug, Clone, Default)]
pub struct PairIndex {
    positions: Positions,
}

impl PairIndex {
    /// Bulk-build the index with a single left-to-right scan.
    pub fn build(tokens: &[u32]) -> Self {
        Self {
            positions: index_chunk(tokens, 0),
        }
    }

    /// Bulk-build the index, in parallel when `options` allow it and the
    /// sequence is long enough to pay for it.
    pub fn build_with_options(tokens: &[u32], options: PairIndexOptions) -> Self {
        if options.parallel && tokens.len() >= MIN_PARALLEL_LEN {
            let chunk_len = (tokens.len() / rayon::current_num_threads()).max(MIN_PARALLEL_LEN / 4);
            Self::build_parallel(tokens, chunk_len)
        } else {
            Self::build(tokens)
        }
    }

    /// Bulk-build the index from independently indexed chunks.
    ///
    /// Each chunk of `chunk_len` tokens is indexed on its own thread; the
    /// pairs straddling chunk edges are reconciled afterwards on the calling
    /// thread.
    pub fn build_parallel(tokens: &[u32], chunk_len: usize) -> Self {
        let chunk_len = chunk_len.max(2);

        let mut positions = tokens
            .par_chunks(chunk_len)
            .enumerate()
            .map(|(i, chunk)| index_chunk(chunk, i * chunk_len))
            .reduce(Positions::default, |mut acc, part| {
                for (pair, set) in part {
                    match acc.get_mut(&pair) {
                        Some(existing) => existing.extend(set),
                        None => {
                            acc.insert(pair, set);
                        }
                    }
                }
                acc
            });

        for boundary in (chunk_len..tokens.len()).step_by(chunk_len) {
            let pair = (tokens[boundary - 1], tokens[boundary]);
            positions.entry(pair).or_default().insert(boundary - 1);
        }

        Self { positions }
    }

    /// Current count of a pair.
    #[inline]
    pub fn count(&self, pair: Pair) -> u64 {
        self.positions.get(&pair).map_or(0, |set| set.len() as u64)
    }

    /// Record an occurrence of `pair` starting at `pos`.
    ///
    /// Returns false if the occurrence was already recorded.
    pub fn add(&mut self, pair: Pair, pos: usize) -> bool {
        self.positions.entry(pair).or_default().insert(pos)
    }

    /// Forget the occurrence of `pair` starting at `pos`.
    ///
    /// Returns false if it was not recorded. A pair whose last occurrence is
    /// removed leaves the index.
    pub fn remove(&mut self, pair: Pair, pos: usize) -> bool {
        let Some(set) = self.positions.get_mut(&pair) else {
            return false;
        };
        let removed = set.remove(&pos);
        if set.is_empty() {
            self.positions.remove(&pair);
        }
        removed
    }

    /// Remove a pair entirely, returning its positions in ascending order.
    pub fn take_positions(&mut self, pair: Pair) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .positions
            .remove(&pair)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        positions.sort_unstable();
        positions
    }

    /// Iterate over `(pair, count)` for every live pair, in no fixed order.
    pub fn counts(&self) -> impl Iterator<Item = (Pair, u64)> + '_ {
        self.positions
            .iter()
            .map(|(&pair, set)| (pair, set.len() as u64))
    }

    /// Snapshot of all counts as a map.
    pub fn count_map(&self) -> AHashMap<Pair, u64> {
        self.counts().collect()
    }

    /// Number of distinct live pairs.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if no pair is live.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Index the pairs of `chunk`, whose first token sits at `offset`.
fn index_chunk(chunk: &[u32], offset: usize) -> Positions {
    let mut positions = Positions::default();
    for (i, window) in chunk.windows(2).enumerate() {
        positions
            .entry((window[0], window[1]))
            .or_default()
            .insert(offset + i);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::counter::PairCounter;

    fn sorted(index: &PairIndex) -> Vec<(Pair, u64)> {
        let mut counts: Vec<_> = index.counts().collect();
        counts.sort_unstable();
        counts
    }

    #[test]
    fn test_build() {
        let tokens: Vec<u32> = b"aaabdaaabac".iter().map(|&b| b as u32).collect();
        let index = PairIndex::build(&tokens);

        assert_eq!(index.count((97, 97)), 4);
        assert_eq!(index.count((97, 98)), 2);
        assert_eq!(index.count((256, 97)), 0);
        assert_eq!(index.len(), 6);

        let mut index = index;
        assert_eq!(index.take_positions((97, 97)), vec![0, 1, 5, 6]);
        assert_eq!(index.count((97, 97)), 0);
    }

    #[test]
    fn test_build_parallel_matches_sequential() {
        let tokens: Vec<u32> = (0..5000u32).map(|i| (i * 31 + i / 7) % 11).collect();
        let expected = PairIndex::build(&tokens);

        for chunk_len in [2, 3, 100, 4999, 5000, 10_000] {
            let index = PairIndex::build_parallel(&tokens, chunk_len);
            assert_eq!(sorted(&index), sorted(&expected), "chunk_len {chunk_len}");
            for (pair, _) in expected.counts() {
                let mut a = index.positions[&pair].iter().copied().collect::<Vec<_>>();
                let mut b = expected.positions[&pair].iter().copied().collect::<Vec<_>>();
                a.sort_unstable();
                b.sort_unstable();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_build_matches_counter() {
        let tokens: Vec<u32> = b"the cat sat on the mat".iter().map(|&b| b as u32).collect();
        let index = PairIndex::build_with_options(&tokens, PairIndexOptions::default());

        let mut expected: Vec<_> = PairCounter::new(&tokens)
            .count_pairs_sequential()
            .into_iter()
            .collect();
        expected.sort_unstable();
        assert_eq!(sorted(&index), expected);
    }

    #[test]
    fn test_add_remove() {
        let mut index = PairIndex::default();

        assert!(index.add((1, 2), 0));
        assert!(index.add((1, 2), 5));
        assert!(!index.add((1, 2), 5));
        assert_eq!(index.count((1, 2)), 2);

        assert!(index.remove((1, 2), 0));
        assert!(!index.remove((1, 2), 0));
        assert!(!index.remove((3, 4), 0));
        assert_eq!(index.count((1, 2)), 1);

        assert!(index.remove((1, 2), 5));
        assert!(index.is_empty());
    }
}
