//! Pair counting by full scan.
//!
//! `PairCounter` recounts every adjacent pair of a token slice from scratch.
//! The trainer never uses it on the hot path; it is the reference the
//! incremental pair index is checked against, and the simple (slow) way to
//! run BPE end to end.

use ahash::AHashMap;
use bytemerge_core::Pair;
use rayon::prelude::*;

/// Counter for BPE pair frequencies over a token slice.
#[derive(Debug, Clone, Copy)]
pub struct PairCounter<'a> {
    tokens: &'a [u32],
}

impl<'a> PairCounter<'a> {
    /// Create a counter over a token sequence.
    pub fn new(tokens: &'a [u32]) -> Self {
        Self { tokens }
    }

    /// Count all pairs sequentially.
    pub fn count_pairs_sequential(&self) -> AHashMap<Pair, u64> {
        let mut pair_counts: AHashMap<Pair, u64> = AHashMap::new();

        for window in self.tokens.windows(2) {
            *pair_counts.entry((window[0], window[1])).or_insert(0) += 1;
        }

        pair_counts
    }

    /// Count all pairs in parallel.
    ///
    /// The slice is split into chunks of `chunk_len` tokens counted
    /// independently; the pairs straddling chunk edges are added afterwards.
    pub fn count_pairs_parallel(&self, chunk_len: usize) -> AHashMap<Pair, u64> {
        let chunk_len = chunk_len.max(2);

        let mut pair_counts = self
            .tokens
            .par_chunks(chunk_len)
            .map(|chunk| PairCounter::new(chunk).count_pairs_sequential())
            .reduce(AHashMap::new, |mut acc, pair_counts| {
                for (pair, count) in pair_counts {
                    *acc.entry(pair).or_insert(0) += count;
                }
                acc
            });

        for boundary in (chunk_len..self.tokens.len()).step_by(chunk_len) {
            let pair = (self.tokens[boundary - 1], self.tokens[boundary]);
            *pair_counts.entry(pair).or_insert(0) += 1;
        }

        pair_counts
    }

    /// The most frequent pair, ties going to the smallest pair.
    pub fn most_frequent(&self) -> Option<(Pair, u64)> {
        self.count_pairs_sequential()
            .into_iter()
            .max_by(|(pa, ca), (pb, cb)| ca.cmp(cb).then_with(|| pb.cmp(pa)))
    }
}

/// Replace every occurrence of `pair` in `tokens`, scanning left to right.
///
/// Returns the number of replacements.
pub fn merge_pair_in_place(tokens: &mut Vec<u32>, pair: Pair, new_token_id: u32) -> usize {
    let mut merged = 0;
    let mut write = 0;
    let mut read = 0;

    while read < tokens.len() {
        if read + 1 < tokens.len() && (tokens[read], tokens[read + 1]) == pair {
            tokens[write] = new_token_id;
            read += 2;
            merged += 1;
        } else {
            tokens[write] = tokens[read];
            read += 1;
        }
        write += 1;
    }

    tokens.truncate(write);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(counts: AHashMap<Pair, u64>) -> Vec<(Pair, u64)> {
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_unstable();
        counts
    }

    #[test]
    fn test_count_pairs_sequential() {
        let tokens = [97, 97, 97, 98, 100, 97, 97, 97, 98, 97, 99];
        let pairs = PairCounter::new(&tokens).count_pairs_sequential();

        assert_eq!(pairs.get(&(97, 97)), Some(&4));
        assert_eq!(pairs.get(&(97, 98)), Some(&2));
        assert_eq!(pairs.get(&(98, 100)), Some(&1));
        assert_eq!(pairs.values().sum::<u64>(), tokens.len() as u64 - 1);
    }

    #[test]
    fn test_count_pairs_parallel_matches_sequential() {
        let tokens: Vec<u32> = (0..1000u32).map(|i| (i * 7 + i / 3) % 5).collect();
        let counter = PairCounter::new(&tokens);
        let expected = sorted(counter.count_pairs_sequential());

        for chunk_len in [1, 2, 3, 7, 64, 999, 1000, 5000] {
            assert_eq!(
                sorted(counter.count_pairs_parallel(chunk_len)),
                expected,
                "chunk_len {chunk_len}"
            );
        }
    }

    #[test]
    fn test_most_frequent_tie_break() {
        let tokens: Vec<u32> = b"abcabcxyxy".iter().map(|&b| b as u32).collect();
        assert_eq!(
            PairCounter::new(&tokens).most_frequent(),
            Some(((97, 98), 2))
        );
        assert_eq!(PairCounter::new(&[1]).most_frequent(), None);
    }

    #[test]
    fn test_merge_pair_in_place() {
        let mut tokens = vec![97, 97, 97, 97, 97, 98];
        assert_eq!(merge_pair_in_place(&mut tokens, (97, 97), 256), 2);
        assert_eq!(tokens, vec![256, 256, 97, 98]);
    }
}
