//! Byte-level BPE encoding and decoding.
//!
//! Encoding replays a frozen merge table over new bytes. The result is the
//! sequence obtained by applying every rule in rank order, each rule
//! replacing all of its adjacent occurrences from left to right.
//!
//! Rather than scanning once per rule, the encoder keeps a heap of
//! `(rank, position)` merge opportunities over a linked token list and always
//! applies the lowest rank at the leftmost position. A rule's operands are
//! always older than the rule, so once rank `r` has been applied no pair of a
//! lower rank can appear again, and both strategies produce the same tokens.

use crate::core::merges::MergeRules;
use crate::core::vocab::Vocabulary;
use crate::encoding::sequencer::byte_sequence;
use crate::error::{Result, TokenizerError};
use dary_heap::OctonaryHeap;
use std::cmp::Ordering;
use std::sync::Arc;

/// A pending merge at a list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MergeOp {
    rank: u32,
    pos: usize,
}

/// Lowest rank first, then leftmost position.
impl Ord for MergeOp {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rank
            .cmp(&self.rank)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for MergeOp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const NONE: usize = usize::MAX;

/// Byte-level BPE encoder over a shared, frozen vocabulary and merge table.
///
/// Cloning is cheap: both tables are behind `Arc`.
#[derive(Debug, Clone)]
pub struct ByteLevelEncoder {
    /// Vocabulary for decoding (ID -> bytes)
    vocab: Arc<Vocabulary>,
    /// Merge rules in rank order
    merges: Arc<MergeRules>,
}

impl ByteLevelEncoder {
    /// Create an encoder, taking ownership of the tables.
    pub fn new(vocab: Vocabulary, merges: MergeRules) -> Result<Self> {
        Self::with_arcs(Arc::new(vocab), Arc::new(merges))
    }

    /// Create an encoder sharing already `Arc`-wrapped tables.
    ///
    /// Fails with `CorruptRuleTable` if the vocabulary was not built from
    /// exactly these rules.
    pub fn with_arcs(vocab: Arc<Vocabulary>, merges: Arc<MergeRules>) -> Result<Self> {
        if vocab.merge_count() != merges.len() {
            let rank = vocab.merge_count().min(merges.len());
            let pair = merges.rule(rank).map(|r| r.pair).unwrap_or_default();
            return Err(TokenizerError::CorruptRuleTable {
                rank,
                pair,
                reason: format!(
                    "vocabulary holds {} merged entries but the table has {} rules",
                    vocab.merge_count(),
                    merges.len()
                ),
            });
        }
        for rule in merges.iter() {
            if vocab.parents(rule.new_id) != Some(rule.pair) {
                return Err(TokenizerError::CorruptRuleTable {
                    rank: rule.rank as usize,
                    pair: rule.pair,
                    reason: format!("vocabulary entry {} was built differently", rule.new_id),
                });
            }
        }

        Ok(Self { vocab, merges })
    }

    /// The shared vocabulary.
    pub fn vocab(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    /// The shared merge table.
    pub fn merges(&self) -> &Arc<MergeRules> {
        &self.merges
    }

    /// Encode raw bytes to token IDs.
    pub fn encode(&self, bytes: &[u8]) -> Vec<u32> {
        let mut tokens = byte_sequence(bytes);
        self.apply_merges(&mut tokens);
        tokens
    }

    /// Apply the merge table to an already sequenced token list in place.
    pub fn apply_merges(&self, tokens: &mut Vec<u32>) {
        let n = tokens.len();
        if n < 2 || self.merges.is_empty() {
            return;
        }

        let mut next: Vec<usize> = (1..=n).map(|i| if i == n { NONE } else { i }).collect();
        let mut prev: Vec<usize> = (0..n).map(|i| i.wrapping_sub(1)).collect();
        let mut alive = vec![true; n];

        let mut heap = OctonaryHeap::with_capacity(n);
        for (pos, window) in tokens.windows(2).enumerate() {
            if let Some((rank, _)) = self.merges.get((window[0], window[1])) {
                heap.push(MergeOp { rank, pos });
            }
        }

        let mut applied = 0usize;
        while let Some(op) = heap.pop() {
            let pos = op.pos;
            if !alive[pos] || next[pos] == NONE {
                continue;
            }
            let right = next[pos];
            let Some((rank, new_id)) = self.merges.get((tokens[pos], tokens[right])) else {
                continue;
            };
            if rank != op.rank {
                continue;
            }

            tokens[pos] = new_id;
            alive[right] = false;
            next[pos] = next[right];
            if next[pos] != NONE {
                prev[next[pos]] = pos;
            }
            applied += 1;

            if prev[pos] != NONE {
                let left = prev[pos];
                if let Some((rank, _)) = self.merges.get((tokens[left], new_id)) {
                    heap.push(MergeOp { rank, pos: left });
                }
            }
            if next[pos] != NONE {
                if let Some((rank, _)) = self.merges.get((new_id, tokens[next[pos]])) {
                    heap.push(MergeOp { rank, pos });
                }
            }
        }

        log::trace!("applied {applied} merges to {n} bytes");

        let mut write = 0;
        for read in 0..n {
            if alive[read] {
                tokens[write] = tokens[read];
                write += 1;
            }
        }
        tokens.truncate(write);
    }

    /// Decode token IDs back to bytes.
    ///
    /// Unknown IDs are an error; they are never mapped to a default byte.
    pub fn decode(&self, ids: &[u32]) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(ids.len() * 2);
        for &id in ids {
            bytes.extend_from_slice(self.vocab.resolve(id)?);
        }
        Ok(bytes)
    }

    /// Decode token IDs to text, replacing invalid UTF-8 with U+FFFD.
    pub fn decode_lossy(&self, ids: &[u32]) -> Result<String> {
        let bytes = self.decode(ids)?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }
}
