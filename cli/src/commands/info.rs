//! Info command implementation.

use clap::Parser;
use std::path::PathBuf;

/// Info command arguments.
#[derive(Parser)]
pub struct InfoCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: PathBuf,

    /// Number of merges to list
    #[arg(short = 'n', long, default_value_t = 20)]
    pub merges: usize,
}

use anyhow::{Context, Result as AnyhowResult};
use bytemerge_tokenizer::io::format::escape_bytes;
use bytemerge_tokenizer::Tokenizer;

pub fn run(cmd: InfoCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(&cmd.tokenizer)
        .with_context(|| format!("failed to load tokenizer {}", cmd.tokenizer.display()))?;

    println!("Tokenizer: {}", cmd.tokenizer.display());
    println!("  Vocab size: {}", tokenizer.vocab_size());
    println!("  Merges: {}", tokenizer.merges().len());
    if let Some(config) = tokenizer.config() {
        println!("  Trained with: {}", serde_json::to_string(config)?);
    }

    if cmd.merges > 0 && !tokenizer.merges().is_empty() {
        println!();
        println!("{:>6}  {:>15}  {:>7}  bytes", "rank", "pair", "id");
        for rule in tokenizer.merges().iter().take(cmd.merges) {
            let bytes = tokenizer.vocab().resolve(rule.new_id)?;
            println!(
                "{:>6}  {:>15}  {:>7}  {}",
                rule.rank,
                format!("({}, {})", rule.pair.0, rule.pair.1),
                rule.new_id,
                escape_bytes(bytes)
            );
        }
    }

    Ok(())
}
