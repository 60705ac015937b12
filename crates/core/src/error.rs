//! Error types for the byte-pair encoding library.

use crate::core::merges::Pair;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tokenizer library.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Training configuration rejected before training starts
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Token id outside the current vocabulary
    #[error("Unknown token ID {id} (vocabulary has {vocab_size} entries)")]
    UnknownTokenId { id: u32, vocab_size: usize },

    /// Persisted merge table violates the append-only construction order
    #[error("Corrupt rule table at rank {rank}, pair ({}, {}): {reason}", .pair.0, .pair.1)]
    CorruptRuleTable {
        rank: usize,
        pair: Pair,
        reason: String,
    },

    /// Token id space exhausted
    #[error("Vocabulary size exceeded maximum of {max} entries")]
    VocabularyOverflow { max: usize },

    /// Training engine driven out of order
    #[error("Training error: {0}")]
    Training(String),

    /// Error loading a persisted model
    #[error("Load error: {0}")]
    Load(String),

    /// I/O error with file context
    #[error("I/O error for {}: {err}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TokenizerError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            err,
        }
    }

    pub(crate) fn corrupt(rank: usize, pair: Pair, reason: impl Into<String>) -> Self {
        Self::CorruptRuleTable {
            rank,
            pair,
            reason: reason.into(),
        }
    }
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
