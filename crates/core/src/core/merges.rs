//! Merge rule management for BPE.
//!
//! The merge table is the ordered log of every merge decision. Rules are
//! stored in rank order together with a pair lookup map so encoding can find
//! the rank of any adjacent pair in O(1).

use crate::core::vocab::{Vocabulary, BYTE_VOCAB_SIZE};
use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A pair of token IDs that can be merged.
pub type Pair = (u32, u32);

/// Merge rule mapping: pair -> (rank, new_token_id).
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// A single immutable merge decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRule {
    /// The adjacent pair that was merged
    pub pair: Pair,
    /// The ID minted for the merged token
    pub new_id: u32,
    /// Order of discovery (0 = first merge)
    pub rank: u32,
}

/// Ordered collection of BPE merge rules with pair lookup.
#[derive(Debug, Clone, Default)]
pub struct MergeRules {
    /// Rules in rank order
    rules: Vec<MergeRule>,
    /// Merge rules: pair -> (rank, new_token_id)
    merges: MergeMap,
}

impl MergeRules {
    /// Create a new empty collection of merge rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new collection with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            merges: MergeMap::with_capacity(capacity),
        }
    }

    /// The ID the next appended rule must mint.
    #[inline]
    pub fn next_id(&self) -> u32 {
        (BYTE_VOCAB_SIZE + self.rules.len()) as u32
    }

    /// Append a merge rule.
    ///
    /// `new_id` must be [`next_id`](Self::next_id), both operands must be
    /// older than it, and the pair must not have been merged before.
    pub fn push(&mut self, pair: Pair, new_id: u32) -> Result<MergeRule> {
        let rank = self.rules.len();
        let expected = self.next_id();

        if new_id != expected {
            return Err(TokenizerError::corrupt(
                rank,
                pair,
                format!("expected new id {expected}, found {new_id}"),
            ));
        }
        if pair.0 >= new_id || pair.1 >= new_id {
            return Err(TokenizerError::corrupt(
                rank,
                pair,
                "operand is not defined before this rule",
            ));
        }
        if let Some(&(earlier, _)) = self.merges.get(&pair) {
            return Err(TokenizerError::corrupt(
                rank,
                pair,
                format!("pair already merged at rank {earlier}"),
            ));
        }

        let rule = MergeRule {
            pair,
            new_id,
            rank: rank as u32,
        };
        self.merges.insert(pair, (rule.rank, new_id));
        self.rules.push(rule);
        Ok(rule)
    }

    /// Build a validated table from an ordered list of rules.
    ///
    /// Ranks must be `0, 1, 2, ...` in order; see [`push`](Self::push) for
    /// the other constraints.
    pub fn from_rules(rules: impl IntoIterator<Item = MergeRule>) -> Result<Self> {
        let iter = rules.into_iter();
        let mut table = Self::with_capacity(iter.size_hint().0);

        for rule in iter {
            let rank = table.len();
            if rule.rank as usize != rank {
                return Err(TokenizerError::corrupt(
                    rank,
                    rule.pair,
                    format!("rule stored with rank {}", rule.rank),
                ));
            }
            table.push(rule.pair, rule.new_id)?;
        }

        Ok(table)
    }

    /// Build a table from pairs in rank order, assigning IDs from 256.
    pub fn from_pairs(pairs: impl IntoIterator<Item = Pair>) -> Result<Self> {
        let mut table = Self::new();
        for pair in pairs {
            let id = table.next_id();
            table.push(pair, id)?;
        }
        Ok(table)
    }

    /// Replay the table into a fresh vocabulary.
    pub fn build_vocab(&self) -> Result<Vocabulary> {
        let mut vocab = Vocabulary::with_capacity(BYTE_VOCAB_SIZE + self.len());
        for rule in &self.rules {
            let id = vocab.add_merge_entry(rule.pair.0, rule.pair.1)?;
            debug_assert_eq!(id, rule.new_id);
        }
        Ok(vocab)
    }

    /// Get the merge rule for a pair.
    ///
    /// Returns Some((rank, new_token_id)) if this pair should be merged,
    /// None otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.merges.get(&pair).copied()
    }

    /// Get the rule at a given rank.
    #[inline]
    pub fn rule(&self, rank: usize) -> Option<&MergeRule> {
        self.rules.get(rank)
    }

    /// Iterate over the rules in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, MergeRule> {
        self.rules.iter()
    }

    /// Rules in rank order.
    pub fn as_slice(&self) -> &[MergeRule] {
        &self.rules
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PartialEq for MergeRules {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules
    }
}

impl Eq for MergeRules {}

impl<'a> IntoIterator for &'a MergeRules {
    type Item = &'a MergeRule;
    type IntoIter = std::slice::Iter<'a, MergeRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
