//! CLI commands for the bytemerge tokenizer.

pub mod benchmark;
pub mod decode;
pub mod encode;
pub mod info;
pub mod train;

pub use benchmark::BenchmarkCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use info::InfoCommand;
pub use train::TrainCommand;
