//! bytemerge-tokenizer - High-level tokenizer API
//!
//! This crate wraps the training engine and the byte-level encoder into a
//! single `Tokenizer` that can be trained, saved, loaded and shared across
//! threads.
//!
//! # Features
//!
//! - One-call training with a summary report
//! - Parallel batch encoding
//! - Saving and loading as JSON or as a plain text merge list
//!
//! # Example
//!
//! ```rust
//! use bytemerge_tokenizer::{Tokenizer, TrainingConfig};
//!
//! let config = TrainingConfig::builder().vocab_size(300).build()?;
//! let (tokenizer, report) = Tokenizer::train(b"hello world, hello bytes", config)?;
//!
//! let ids = tokenizer.encode(b"hello");
//! assert_eq!(tokenizer.decode(&ids)?, b"hello");
//! assert!(report.compression_ratio() >= 1.0);
//! # Ok::<(), bytemerge_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use bytemerge_core::{MergeRule, MergeRules, Pair, Result, TokenizerError, Vocabulary};
pub use bytemerge_training::{StopReason, TrainingConfig};

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::{Tokenizer, TrainingReport};

// IO/Serialization
pub mod io;
pub use io::{LoadedModel, ModelFormat, TokenizerLoader, TokenizerSaver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
