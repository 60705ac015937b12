//! Benchmark command implementation.

use clap::Parser;
use std::path::PathBuf;

/// Benchmark command arguments.
#[derive(Parser)]
pub struct BenchmarkCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: PathBuf,

    /// Path to input file for benchmarking
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of iterations to run
    #[arg(short = 'n', long, default_value_t = 100)]
    pub iterations: usize,

    /// Encode the file line by line in parallel instead of as one input
    #[arg(long)]
    pub batch: bool,
}

use anyhow::{Context, Result as AnyhowResult};
use bytemerge_tokenizer::Tokenizer;
use std::fs;
use std::time::Instant;

pub fn run(cmd: BenchmarkCommand) -> AnyhowResult<()> {
    anyhow::ensure!(cmd.iterations > 0, "--iterations must be at least 1");

    let tokenizer = Tokenizer::load(&cmd.tokenizer)
        .with_context(|| format!("failed to load tokenizer {}", cmd.tokenizer.display()))?;

    let data = fs::read(&cmd.input)
        .with_context(|| format!("failed to read {}", cmd.input.display()))?;
    let lines: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();

    println!("Benchmarking encoding...");
    println!("  Input length: {} bytes", data.len());
    println!("  Iterations: {}", cmd.iterations);
    if cmd.batch {
        println!("  Batch: {} lines", lines.len());
    }
    println!();

    let encode = || -> usize {
        if cmd.batch {
            tokenizer.encode_batch(&lines).iter().map(Vec::len).sum()
        } else {
            tokenizer.encode(&data).len()
        }
    };

    // Warmup
    let tokens = encode();

    let start = Instant::now();
    for _ in 0..cmd.iterations {
        std::hint::black_box(encode());
    }
    let elapsed = start.elapsed();

    let per_iter = elapsed.as_secs_f64() / cmd.iterations as f64;
    let (bytes_per_sec, tokens_per_sec) = if per_iter > 0.0 {
        (data.len() as f64 / per_iter, tokens as f64 / per_iter)
    } else {
        (f64::INFINITY, f64::INFINITY)
    };

    println!("Results:");
    println!("  Tokens per pass: {}", tokens);
    println!("  Total time: {:.2}s", elapsed.as_secs_f64());
    println!("  Average time: {:.3}ms", per_iter * 1000.0);
    println!("  Throughput: {:.2} MB/s", bytes_per_sec / 1_000_000.0);
    println!("  Throughput: {:.0} tokens/s", tokens_per_sec);

    Ok(())
}
