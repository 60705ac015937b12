//! Core BPE data structures.
//!
//! This module contains the vocabulary, the merge rule table and the pair
//! priority queue shared by training and encoding.

pub mod merges;
pub mod priority;
pub mod vocab;

pub use merges::{MergeMap, MergeRule, MergeRules, Pair};
pub use priority::{MergeCandidate, PairPriorityQueue};
pub use vocab::{Vocab, VocabR, Vocabulary, BYTE_VOCAB_SIZE};
