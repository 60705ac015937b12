//! Load functionality for pre-trained tokenizers.
//!
//! Every load rebuilds the vocabulary from the merge rules, so a table that
//! was edited or truncated on disk is rejected rather than silently producing
//! different tokens.

use super::format::{
    ModelFormat, SerializedTokenizer, FORMAT_VERSION, JSON_FILE, MERGES_FILE,
};
use bytemerge_core::{
    MergeRule, MergeRules, Pair, Result, TokenizerError, Vocabulary, BYTE_VOCAB_SIZE,
};
use bytemerge_training::TrainingConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A validated model read from disk.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// Vocabulary rebuilt from the rules
    pub vocab: Vocabulary,
    /// Merge rules in rank order
    pub merges: MergeRules,
    /// Training configuration, if the file recorded one
    pub config: Option<TrainingConfig>,
    /// Format the model was stored in
    pub format: ModelFormat,
}

/// Tokenizer loader - handles loading trained models.
pub struct TokenizerLoader;

impl TokenizerLoader {
    /// Load a model, detecting its format.
    ///
    /// `path` is either a model directory (containing `tokenizer.json` or
    /// `merges.txt`) or one of those files.
    pub fn load(path: &Path) -> Result<LoadedModel> {
        let format = ModelFormat::detect(path).ok_or_else(|| {
            TokenizerError::Load(format!(
                "no {JSON_FILE} or {MERGES_FILE} found at {}",
                path.display()
            ))
        })?;

        let model = match format {
            ModelFormat::Json => Self::load_json(&Self::resolve(path, JSON_FILE))?,
            ModelFormat::Text => Self::load_text(&Self::resolve(path, MERGES_FILE))?,
        };

        log::info!(
            "Loaded {} merges ({} format) from {}",
            model.merges.len(),
            format,
            path.display()
        );
        Ok(model)
    }

    /// Load a `tokenizer.json` file.
    pub fn load_json(file_path: &Path) -> Result<LoadedModel> {
        let file = File::open(file_path).map_err(|e| TokenizerError::io(file_path, e))?;
        let reader = BufReader::new(file);
        let serialized: SerializedTokenizer = serde_json::from_reader(reader)?;

        Self::deserialize(serialized)
    }

    /// Load a `merges.txt` file.
    ///
    /// Blank lines and lines starting with `#` are skipped; every other line
    /// is one `left right` rule, in rank order.
    pub fn load_text(file_path: &Path) -> Result<LoadedModel> {
        let content =
            std::fs::read_to_string(file_path).map_err(|e| TokenizerError::io(file_path, e))?;

        let mut pairs: Vec<Pair> = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            pairs.push(parse_pair(line).ok_or_else(|| {
                TokenizerError::Load(format!(
                    "{}:{}: expected `left right` token IDs, found '{}'",
                    file_path.display(),
                    line_num + 1,
                    line
                ))
            })?);
        }

        let merges = MergeRules::from_pairs(pairs)?;
        let vocab = merges.build_vocab()?;

        Ok(LoadedModel {
            vocab,
            merges,
            config: None,
            format: ModelFormat::Text,
        })
    }

    /// Validate a deserialized model and rebuild its tables.
    pub fn deserialize(data: SerializedTokenizer) -> Result<LoadedModel> {
        if data.version != FORMAT_VERSION {
            return Err(TokenizerError::Load(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                data.version
            )));
        }
        if data.base_vocab_size != BYTE_VOCAB_SIZE {
            return Err(TokenizerError::Load(format!(
                "base vocabulary of {} entries is not supported (expected {BYTE_VOCAB_SIZE})",
                data.base_vocab_size
            )));
        }

        let merges = MergeRules::from_rules(data.merges.into_iter().map(MergeRule::from))?;
        let vocab = merges.build_vocab()?;

        if data.vocab.len() != merges.len() {
            let rank = data.vocab.len().min(merges.len());
            let pair = merges.rule(rank).map(|r| r.pair).unwrap_or_default();
            return Err(TokenizerError::CorruptRuleTable {
                rank,
                pair,
                reason: format!(
                    "{} stored vocabulary entries for {} rules",
                    data.vocab.len(),
                    merges.len()
                ),
            });
        }

        for (rank, entry) in data.vocab.iter().enumerate() {
            let pair = merges.rule(rank).map(|r| r.pair).unwrap_or_default();
            let expected_id = (BYTE_VOCAB_SIZE + rank) as u32;
            if entry.id != expected_id || vocab.resolve(entry.id)? != entry.bytes.as_slice() {
                return Err(TokenizerError::CorruptRuleTable {
                    rank,
                    pair,
                    reason: format!(
                        "stored vocabulary entry {} does not match the bytes its rule produces",
                        entry.id
                    ),
                });
            }
        }

        Ok(LoadedModel {
            vocab,
            merges,
            config: data.config,
            format: ModelFormat::Json,
        })
    }

    fn resolve(path: &Path, file_name: &str) -> PathBuf {
        if path.is_dir() {
            path.join(file_name)
        } else {
            path.to_path_buf()
        }
    }
}

fn parse_pair(line: &str) -> Option<Pair> {
    let mut parts = line.split_whitespace();
    let left = parts.next()?.parse().ok()?;
    let right = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(_) => None,
        None => Some((left, right)),
    }
}
