//! Main tokenizer implementation.
//!
//! `Tokenizer` is the frozen result of a training run: a vocabulary and merge
//! table shared behind `Arc`, plus the byte-level encoder that replays them.

use crate::io::{ModelFormat, TokenizerLoader, TokenizerSaver};
use bytemerge_core::{ByteLevelEncoder, MergeRules, Result, Vocabulary};
use bytemerge_training::{BpeTrainer, StopReason, TrainingConfig, TrainingOutcome};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    /// Why training stopped; `None` if it was cut short by the caller
    pub stop_reason: Option<StopReason>,
    /// Number of merge rules learned
    pub merges: usize,
    /// Final vocabulary size, byte entries included
    pub vocab_size: usize,
    /// Corpus length in bytes
    pub corpus_bytes: usize,
    /// Corpus length in tokens after training
    pub final_tokens: usize,
}

impl TrainingReport {
    /// Average number of corpus bytes per token.
    pub fn compression_ratio(&self) -> f64 {
        if self.final_tokens == 0 {
            1.0
        } else {
            self.corpus_bytes as f64 / self.final_tokens as f64
        }
    }
}

/// Main tokenizer struct.
///
/// Cloning is cheap and the tokenizer is `Send + Sync`, so one instance can
/// serve any number of concurrent encode and decode calls.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    encoder: ByteLevelEncoder,
    /// Configuration the model was trained with, when known
    config: Option<TrainingConfig>,
}

impl Tokenizer {
    /// Train a tokenizer on `corpus`.
    pub fn train(corpus: &[u8], config: TrainingConfig) -> Result<(Self, TrainingReport)> {
        Self::from_outcome(BpeTrainer::train(config, corpus)?)
    }

    /// Freeze the output of a trainer driven step by step.
    pub fn from_outcome(outcome: TrainingOutcome) -> Result<(Self, TrainingReport)> {
        let report = TrainingReport {
            stop_reason: outcome.stop_reason,
            merges: outcome.merges.len(),
            vocab_size: outcome.vocab.len(),
            corpus_bytes: outcome.corpus_len,
            final_tokens: outcome.tokens.len(),
        };

        let mut tokenizer = Self::from_parts(outcome.vocab, outcome.merges)?;
        tokenizer.config = Some(outcome.config);
        Ok((tokenizer, report))
    }

    /// Build a tokenizer from a vocabulary and the rules it was built from.
    pub fn from_parts(vocab: Vocabulary, merges: MergeRules) -> Result<Self> {
        Ok(Self {
            encoder: ByteLevelEncoder::new(vocab, merges)?,
            config: None,
        })
    }

    /// Build a tokenizer from a merge table alone.
    pub fn from_merges(merges: MergeRules) -> Result<Self> {
        let vocab = merges.build_vocab()?;
        Self::from_parts(vocab, merges)
    }

    /// Encode raw bytes to token IDs.
    pub fn encode(&self, bytes: &[u8]) -> Vec<u32> {
        self.encoder.encode(bytes)
    }

    /// Encode a batch of inputs (parallelized).
    pub fn encode_batch<T>(&self, inputs: &[T]) -> Vec<Vec<u32>>
    where
        T: AsRef<[u8]> + Sync,
    {
        inputs
            .par_iter()
            .map(|input| self.encoder.encode(input.as_ref()))
            .collect()
    }

    /// Decode token IDs back to bytes.
    pub fn decode(&self, ids: &[u32]) -> Result<Vec<u8>> {
        self.encoder.decode(ids)
    }

    /// Decode token IDs to text, replacing invalid UTF-8.
    pub fn decode_lossy(&self, ids: &[u32]) -> Result<String> {
        self.encoder.decode_lossy(ids)
    }

    /// Get the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.encoder.vocab().len()
    }

    /// Get a reference to the vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        self.encoder.vocab()
    }

    /// Get the merge rules in rank order.
    pub fn merges(&self) -> &MergeRules {
        self.encoder.merges()
    }

    /// Training configuration, if known.
    pub fn config(&self) -> Option<&TrainingConfig> {
        self.config.as_ref()
    }

    /// Save the tokenizer into a directory.
    ///
    /// Returns the path of the primary file written.
    pub fn save(&self, path: &Path, format: ModelFormat) -> Result<PathBuf> {
        TokenizerSaver::new(self.vocab(), self.merges())
            .with_config(self.config.as_ref())
            .save(path, format)
    }

    /// Load a tokenizer from a model directory or file.
    pub fn load(path: &Path) -> Result<Self> {
        let model = TokenizerLoader::load(path)?;
        let mut tokenizer = Self::from_parts(model.vocab, model.merges)?;
        tokenizer.config = model.config;
        Ok(tokenizer)
    }
}
