//! bytemerge-core - Core byte-pair encoding data structures
//!
//! This crate provides the vocabulary store, the ordered merge rule table,
//! the pair priority queue used by training, and the byte-level encoder and
//! decoder that replay a frozen merge table.
//!
//! # Example
//!
//! ```rust
//! use bytemerge_core::{ByteLevelEncoder, MergeRules};
//!
//! // (a, a) -> 256, then (256, b) -> 257
//! let merges = MergeRules::from_pairs([(97, 97), (256, 98)])?;
//! let vocab = merges.build_vocab()?;
//! let encoder = ByteLevelEncoder::new(vocab, merges)?;
//!
//! let ids = encoder.encode(b"aab");
//! assert_eq!(ids, vec![257]);
//! assert_eq!(encoder.decode(&ids)?, b"aab");
//! # Ok::<(), bytemerge_core::TokenizerError>(())
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

pub mod core;
pub use self::core::{
    MergeCandidate, MergeMap, MergeRule, MergeRules, Pair, PairPriorityQueue, Vocab, VocabR,
    Vocabulary, BYTE_VOCAB_SIZE,
};

pub mod encoding;
pub use encoding::{byte_sequence, ByteLevelEncoder};
