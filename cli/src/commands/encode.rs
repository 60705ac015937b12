//! Encode command implementation.

use clap::Parser;
use std::path::PathBuf;

/// Encode command arguments.
#[derive(Parser)]
pub struct EncodeCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: PathBuf,

    /// Text to encode ("-" reads stdin)
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub input: Option<String>,

    /// File whose raw bytes are encoded
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

use anyhow::{Context, Result as AnyhowResult};
use bytemerge_tokenizer::Tokenizer;
use std::io::Read;

pub fn run(cmd: EncodeCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(&cmd.tokenizer)
        .with_context(|| format!("failed to load tokenizer {}", cmd.tokenizer.display()))?;

    let bytes = read_input(&cmd)?;
    let ids = tokenizer.encode(&bytes);
    let output = format_ids(&ids);

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Encoded {} bytes into {} tokens ({})", bytes.len(), ids.len(), path.display());
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}

fn read_input(cmd: &EncodeCommand) -> AnyhowResult<Vec<u8>> {
    if let Some(path) = &cmd.file {
        return std::fs::read(path).with_context(|| format!("failed to read {}", path.display()));
    }
    match cmd.input.as_deref() {
        Some("-") => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
        Some(text) => Ok(text.as_bytes().to_vec()),
        None => anyhow::bail!("either --input or --file is required"),
    }
}

fn format_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ids() {
        assert_eq!(format_ids(&[256, 32, 97]), "256 32 97");
        assert_eq!(format_ids(&[]), "");
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.bin");
        std::fs::write(&path, b"\xffabc").unwrap();

        let cmd = EncodeCommand::try_parse_from([
            "encode",
            "-t",
            "model",
            "-f",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(read_input(&cmd).unwrap(), b"\xffabc".to_vec());
    }

    #[test]
    fn test_input_or_file_required() {
        assert!(EncodeCommand::try_parse_from(["encode", "-t", "model"]).is_err());
        assert!(
            EncodeCommand::try_parse_from(["encode", "-t", "m", "-i", "x", "-f", "y"]).is_err()
        );
    }
}
