//! bytemerge-training - BPE training engine
//!
//! This crate learns an ordered merge table from a corpus of raw bytes.
//!
//! # Features
//!
//! - Step-wise merge engine with an explicit `Idle -> Training -> Stopped` lifecycle
//! - Incrementally maintained pair index; no rescans between merges
//! - Parallel bulk index build with rayon
//! - Deterministic tie-break: highest count, then smallest pair
//!
//! # Example
//!
//! ```rust
//! use bytemerge_training::{BpeTrainer, StopReason, TrainingConfig};
//!
//! let config = TrainingConfig::builder().vocab_size(258).build()?;
//! let outcome = BpeTrainer::train(config, b"aaabdaaabac")?;
//!
//! assert_eq!(outcome.merges.len(), 2);
//! assert_eq!(outcome.tokens, vec![256, 257, 100, 256, 257, 97, 99]);
//! assert_eq!(outcome.stop_reason, Some(StopReason::TargetReached));
//! # Ok::<(), bytemerge_training::TokenizerError>(())
//! ```

pub use bytemerge_core::{Result, TokenizerError};

pub mod training;
pub use training::{
    merge_pair_in_place, BpeTrainer, MergeStep, PairCounter, PairIndex, PairIndexOptions,
    StepOutcome, StopReason, TokenSequence, TrainerState, TrainingConfig, TrainingConfigBuilder,
    TrainingOutcome,
};
