//! Byte-level BPE encoding.
//!
//! - `sequencer`: raw bytes to the initial one-id-per-byte token sequence
//! - `byte_level`: applies a frozen merge table to bytes and decodes ids back

pub mod byte_level;
pub mod sequencer;

pub use byte_level::ByteLevelEncoder;
pub use sequencer::byte_sequence;
