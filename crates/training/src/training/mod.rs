//! Training infrastructure for byte-level BPE.
//!
//! `trainer` drives the merge loop over a linked token `sequence`, keeping
//! the incremental `pair_index` current; `counter` is the full-recount
//! reference.

pub mod counter;
pub mod pair_index;
pub mod sequence;
pub mod trainer;

pub use counter::{merge_pair_in_place, PairCounter};
pub use pair_index::{PairIndex, PairIndexOptions};
pub use sequence::TokenSequence;
pub use trainer::{
    BpeTrainer, MergeStep, StepOutcome, StopReason, TrainerState, TrainingConfig,
    TrainingConfigBuilder, TrainingOutcome,
};
