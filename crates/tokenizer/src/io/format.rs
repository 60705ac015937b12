//! Format definitions for tokenizer serialization.
//!
//! This module defines the on-disk layouts used for saving and loading
//! trained merge tables.

use bytemerge_core::{MergeRule, Pair, TokenizerError};
use bytemerge_training::TrainingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Version written into every saved model.
pub const FORMAT_VERSION: &str = "1.0";

/// File holding the JSON model.
pub const JSON_FILE: &str = "tokenizer.json";

/// File holding the plain text merge list.
pub const MERGES_FILE: &str = "merges.txt";

/// Human-readable vocabulary listing written next to `merges.txt`.
pub const VOCAB_FILE: &str = "vocab.txt";

/// Model format types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Single `tokenizer.json` with rules, vocabulary and training config
    #[default]
    Json,
    /// `merges.txt` (one `left right` rule per line) plus `vocab.txt`
    Text,
}

impl ModelFormat {
    /// Detect the format of a saved model.
    ///
    /// `path` may be a model directory or one of the model files.
    pub fn detect(path: &Path) -> Option<Self> {
        if path.is_dir() {
            if path.join(JSON_FILE).is_file() {
                Some(Self::Json)
            } else if path.join(MERGES_FILE).is_file() {
                Some(Self::Text)
            } else {
                None
            }
        } else if path.is_file() {
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => Some(Self::Json),
                _ => Some(Self::Text),
            }
        } else {
            None
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelFormat::Json => "json",
            ModelFormat::Text => "text",
        })
    }
}

impl FromStr for ModelFormat {
    type Err = TokenizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            other => Err(TokenizerError::InvalidConfiguration(format!(
                "unknown model format '{other}' (expected json or text)"
            ))),
        }
    }
}

/// Merge rule for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedMerge {
    /// The rank/priority of this merge
    pub rank: u32,
    /// The pair of token IDs being merged
    pub pair: Pair,
    /// The new token ID created by this merge
    pub id: u32,
}

impl From<&MergeRule> for SerializedMerge {
    fn from(rule: &MergeRule) -> Self {
        Self {
            rank: rule.rank,
            pair: rule.pair,
            id: rule.new_id,
        }
    }
}

impl From<SerializedMerge> for MergeRule {
    fn from(merge: SerializedMerge) -> Self {
        MergeRule {
            pair: merge.pair,
            new_id: merge.id,
            rank: merge.rank,
        }
    }
}

/// A learned vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedToken {
    /// Token ID
    pub id: u32,
    /// Raw bytes of the token
    pub bytes: Vec<u8>,
}

/// Complete tokenizer serialization format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedTokenizer {
    /// Format version
    pub version: String,
    /// Number of single-byte entries preceding the learned ones
    pub base_vocab_size: usize,
    /// Merge rules in rank order
    pub merges: Vec<SerializedMerge>,
    /// Learned entries (IDs 256 and up)
    pub vocab: Vec<SerializedToken>,
    /// Configuration the model was trained with, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TrainingConfig>,
}

/// Render bytes with ASCII escapes, e.g. `a\xff\n`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_roundtrip() {
        let tokenizer_data = SerializedTokenizer {
            version: FORMAT_VERSION.to_string(),
            base_vocab_size: 256,
            merges: vec![SerializedMerge {
                rank: 0,
                pair: (104, 101),
                id: 256,
            }],
            vocab: vec![SerializedToken {
                id: 256,
                bytes: b"he".to_vec(),
            }],
            config: Some(TrainingConfig {
                vocab_size: Some(1000),
                min_frequency: None,
                parallel: true,
            }),
        };

        let json = serde_json::to_string(&tokenizer_data).unwrap();
        assert!(json.contains(r#""pair":[104,101]"#));

        let deserialized: SerializedTokenizer = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, tokenizer_data);
    }

    #[test]
    fn test_config_is_optional() {
        let json = r#"{"version":"1.0","base_vocab_size":256,"merges":[],"vocab":[]}"#;
        let data: SerializedTokenizer = serde_json::from_str(json).unwrap();
        assert!(data.config.is_none());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<ModelFormat>().unwrap(), ModelFormat::Json);
        assert_eq!("TEXT".parse::<ModelFormat>().unwrap(), ModelFormat::Text);
        assert!("yaml".parse::<ModelFormat>().is_err());
        assert_eq!(ModelFormat::Text.to_string(), "text");
    }

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(b"ab"), "ab");
        assert_eq!(escape_bytes(b" \n\xff"), " \\n\\xff");
    }
}
