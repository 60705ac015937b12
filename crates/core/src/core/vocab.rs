//! Vocabulary storage and lookup.
//!
//! The vocabulary is the authoritative table between token ids and the byte
//! strings they stand for. Ids `0..256` are the raw bytes; every id after that
//! was minted by a merge and its bytes are the concatenation of its two
//! operands.

use crate::core::merges::Pair;
use crate::error::{Result, TokenizerError};
use ahash::AHashMap;

/// Number of single-byte leaf tokens.
pub const BYTE_VOCAB_SIZE: usize = 256;

/// Forward mapping: byte string -> ID
pub type Vocab = AHashMap<Vec<u8>, u32>;

/// Reverse mapping: ID -> byte string
pub type VocabR = Vec<Vec<u8>>;

/// Vocabulary with forward and reverse mappings.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Forward mapping: bytes -> earliest ID producing them
    vocab: Vocab,
    /// Reverse mapping, indexed by ID
    vocab_r: VocabR,
    /// The pair each merged entry was built from, indexed by `id - 256`
    parents: Vec<Pair>,
}

impl Vocabulary {
    /// Create a vocabulary holding the 256 single-byte entries.
    pub fn seed() -> Self {
        Self::with_capacity(BYTE_VOCAB_SIZE)
    }

    /// Create a seeded vocabulary with room for `capacity` entries in total.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(BYTE_VOCAB_SIZE);
        let mut vocab = Vocab::with_capacity(capacity);
        let mut vocab_r = VocabR::with_capacity(capacity);

        for byte in 0..=u8::MAX {
            vocab.insert(vec![byte], byte as u32);
            vocab_r.push(vec![byte]);
        }

        Self {
            vocab,
            vocab_r,
            parents: Vec::with_capacity(capacity - BYTE_VOCAB_SIZE),
        }
    }

    /// Append the entry produced by merging `left` and `right`.
    ///
    /// Returns the freshly assigned ID, which is always
    /// `256 + number of merges so far`.
    pub fn add_merge_entry(&mut self, left: u32, right: u32) -> Result<u32> {
        let id = u32::try_from(self.vocab_r.len()).map_err(|_| {
            TokenizerError::VocabularyOverflow {
                max: u32::MAX as usize,
            }
        })?;

        let (left_bytes, right_bytes) = (self.resolve(left)?, self.resolve(right)?);
        let mut bytes = Vec::with_capacity(left_bytes.len() + right_bytes.len());
        bytes.extend_from_slice(left_bytes);
        bytes.extend_from_slice(right_bytes);

        self.vocab.entry(bytes.clone()).or_insert(id);
        self.vocab_r.push(bytes);
        self.parents.push((left, right));

        Ok(id)
    }

    /// Get the byte string for an ID.
    #[inline]
    pub fn resolve(&self, id: u32) -> Result<&[u8]> {
        self.vocab_r
            .get(id as usize)
            .map(Vec::as_slice)
            .ok_or(TokenizerError::UnknownTokenId {
                id,
                vocab_size: self.vocab_r.len(),
            })
    }

    /// Get the ID for a byte string.
    ///
    /// When several merges produce the same bytes, the earliest ID wins.
    #[inline]
    pub fn id_of(&self, bytes: &[u8]) -> Option<u32> {
        self.vocab.get(bytes).copied()
    }

    /// The pair a merged entry was created from; `None` for byte entries.
    #[inline]
    pub fn parents(&self, id: u32) -> Option<Pair> {
        (id as usize)
            .checked_sub(BYTE_VOCAB_SIZE)
            .and_then(|i| self.parents.get(i))
            .copied()
    }

    /// Check whether an ID is defined.
    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        (id as usize) < self.vocab_r.len()
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.vocab_r.len()
    }

    /// Always false: a vocabulary carries at least the byte entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocab_r.is_empty()
    }

    /// Number of merged (multi-byte) entries.
    #[inline]
    pub fn merge_count(&self) -> usize {
        self.parents.len()
    }

    /// Iterate over `(id, bytes)` in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> + '_ {
        self.vocab_r
            .iter()
            .enumerate()
            .map(|(id, bytes)| (id as u32, bytes.as_slice()))
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        // The forward map is derived from the reverse one.
        self.vocab_r == other.vocab_r && self.parents == other.parents
    }
}

impl Eq for Vocabulary {}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::seed()
    }
}
