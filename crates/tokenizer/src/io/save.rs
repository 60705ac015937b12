//! Save functionality for trained tokenizers.

use super::format::{
    escape_bytes, ModelFormat, SerializedMerge, SerializedToken, SerializedTokenizer,
    FORMAT_VERSION, JSON_FILE, MERGES_FILE, VOCAB_FILE,
};
use bytemerge_core::{MergeRules, Result, TokenizerError, Vocabulary, BYTE_VOCAB_SIZE};
use bytemerge_training::TrainingConfig;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Tokenizer saver - handles saving trained models.
pub struct TokenizerSaver<'a> {
    /// Vocabulary reference
    vocab: &'a Vocabulary,
    /// Merge rules reference
    merges: &'a MergeRules,
    /// Training configuration, recorded for reference
    config: Option<&'a TrainingConfig>,
}

impl<'a> TokenizerSaver<'a> {
    /// Create a new tokenizer saver.
    pub fn new(vocab: &'a Vocabulary, merges: &'a MergeRules) -> Self {
        Self {
            vocab,
            merges,
            config: None,
        }
    }

    /// Record the training configuration alongside the model (JSON only).
    pub fn with_config(mut self, config: Option<&'a TrainingConfig>) -> Self {
        self.config = config;
        self
    }

    /// Save into the directory `path`, creating it if needed.
    ///
    /// Returns the path of the primary file written.
    pub fn save(&self, path: &Path, format: ModelFormat) -> Result<PathBuf> {
        std::fs::create_dir_all(path).map_err(|e| TokenizerError::io(path, e))?;

        let written = match format {
            ModelFormat::Json => self.save_json(path)?,
            ModelFormat::Text => self.save_text(path)?,
        };

        log::info!(
            "Saved {} merges ({} format) to {}",
            self.merges.len(),
            format,
            written.display()
        );
        Ok(written)
    }

    /// Save a single `tokenizer.json` file.
    pub fn save_json(&self, path: &Path) -> Result<PathBuf> {
        let file_path = path.join(JSON_FILE);
        let file = File::create(&file_path).map_err(|e| TokenizerError::io(&file_path, e))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.serialize())?;
        writer
            .flush()
            .map_err(|e| TokenizerError::io(&file_path, e))?;

        Ok(file_path)
    }

    /// Save `merges.txt` and the `vocab.txt` listing.
    pub fn save_text(&self, path: &Path) -> Result<PathBuf> {
        let merges_path = path.join(MERGES_FILE);
        write_file(&merges_path, |w| {
            writeln!(w, "#version: bytemerge {FORMAT_VERSION}")?;
            for rule in self.merges {
                writeln!(w, "{} {}", rule.pair.0, rule.pair.1)?;
            }
            Ok(())
        })?;

        let vocab_path = path.join(VOCAB_FILE);
        write_file(&vocab_path, |w| {
            for (id, bytes) in self.vocab.iter() {
                match self.vocab.parents(id) {
                    Some((left, right)) => writeln!(
                        w,
                        "{id}\t{}\t<- [{left}][{right}]",
                        escape_bytes(bytes)
                    )?,
                    None => writeln!(w, "{id}\t{}", escape_bytes(bytes))?,
                }
            }
            Ok(())
        })?;

        Ok(merges_path)
    }

    /// Serialize the tokenizer to a structure.
    pub fn serialize(&self) -> SerializedTokenizer {
        let merges = self.merges.iter().map(SerializedMerge::from).collect();

        let vocab = self
            .vocab
            .iter()
            .skip(BYTE_VOCAB_SIZE)
            .map(|(id, bytes)| SerializedToken {
                id,
                bytes: bytes.to_vec(),
            })
            .collect();

        SerializedTokenizer {
            version: FORMAT_VERSION.to_string(),
            base_vocab_size: BYTE_VOCAB_SIZE,
            merges,
            vocab,
            config: self.config.cloned(),
        }
    }
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| TokenizerError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| TokenizerError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vocabulary, MergeRules) {
        let merges = MergeRules::from_pairs([(97, 97), (256, 98)]).unwrap();
        let vocab = merges.build_vocab().unwrap();
        (vocab, merges)
    }

    #[test]
    fn test_serialize() {
        let (vocab, merges) = sample();
        let serialized = TokenizerSaver::new(&vocab, &merges).serialize();

        assert_eq!(serialized.version, FORMAT_VERSION);
        assert_eq!(serialized.base_vocab_size, 256);
        assert_eq!(serialized.merges.len(), 2);
        assert_eq!(serialized.merges[1].pair, (256, 98));
        assert_eq!(serialized.merges[1].id, 257);
        assert_eq!(serialized.vocab.len(), 2);
        assert_eq!(serialized.vocab[1].bytes, b"aab".to_vec());
        assert!(serialized.config.is_none());
    }

    #[test]
    fn test_save_text_layout() {
        let (vocab, merges) = sample();
        let dir = tempfile::tempdir().unwrap();

        let written = TokenizerSaver::new(&vocab, &merges)
            .save(dir.path(), ModelFormat::Text)
            .unwrap();
        assert_eq!(written, dir.path().join(MERGES_FILE));

        let merges_txt = std::fs::read_to_string(&written).unwrap();
        let lines: Vec<&str> = merges_txt.lines().collect();
        assert!(lines[0].starts_with('#'));
        assert_eq!(&lines[1..], &["97 97", "256 98"]);

        let vocab_txt = std::fs::read_to_string(dir.path().join(VOCAB_FILE)).unwrap();
        assert_eq!(vocab_txt.lines().count(), 258);
        assert!(vocab_txt.contains("257\taab\t<- [256][98]"));
        assert!(vocab_txt.contains("10\t\\n\n"));
    }

    #[test]
    fn test_save_json_creates_directory() {
        let (vocab, merges) = sample();
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("model").join("v1");

        let written = TokenizerSaver::new(&vocab, &merges)
            .save(&nested, ModelFormat::Json)
            .unwrap();
        assert!(written.ends_with(JSON_FILE));
        assert!(written.is_file());
    }
}
