//! Serialization and deserialization for BPE models.
//!
//! Models are saved either as a single JSON document or as a plain text
//! merge list; loading detects which one it is looking at.

pub mod format;
pub mod load;
pub mod save;

pub use format::{ModelFormat, SerializedTokenizer, JSON_FILE, MERGES_FILE, VOCAB_FILE};
pub use load::{LoadedModel, TokenizerLoader};
pub use save::TokenizerSaver;
