//! Decode command implementation.

use clap::Parser;
use std::path::PathBuf;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: PathBuf,

    /// Token IDs to decode (comma or space separated)
    #[arg(long)]
    pub tokens: String,

    /// Write the decoded raw bytes to this file instead of printing text
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

use anyhow::{Context, Result as AnyhowResult};
use bytemerge_tokenizer::Tokenizer;

pub fn run(cmd: DecodeCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(&cmd.tokenizer)
        .with_context(|| format!("failed to load tokenizer {}", cmd.tokenizer.display()))?;

    let ids = parse_token_ids(&cmd.tokens)?;

    match &cmd.output {
        Some(path) => {
            let bytes = tokenizer.decode(&ids)?;
            std::fs::write(path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Decoded {} tokens into {} bytes ({})", ids.len(), bytes.len(), path.display());
        }
        None => {
            println!("{}", tokenizer.decode_lossy(&ids)?);
        }
    }

    Ok(())
}

/// Parse IDs separated by commas and/or whitespace.
fn parse_token_ids(tokens: &str) -> AnyhowResult<Vec<u32>> {
    tokens
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("invalid token ID '{s}'"))
        })
        .collect()
}
