//! Train command implementation.

use clap::Parser;
use std::path::PathBuf;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training corpus
    #[arg(
        short,
        long,
        conflicts_with = "data_dir",
        required_unless_present = "data_dir"
    )]
    pub input: Option<PathBuf>,

    /// Dataset directory; the corpus is read from <DIR>/train/train.txt
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Output directory for the trained model
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target vocabulary size, including the 256 byte tokens
    #[arg(long)]
    pub vocab_size: Option<usize>,

    /// Minimum pair count for a merge
    #[arg(long)]
    pub min_frequency: Option<u64>,

    /// JSON training configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model format to write (json or text)
    #[arg(short, long, default_value = "json")]
    pub format: ModelFormat,

    /// Number of rayon worker threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Build the initial pair index on a single thread
    #[arg(long)]
    pub no_parallel: bool,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

use anyhow::{Context, Result as AnyhowResult};
use bytemerge_tokenizer::{ModelFormat, Tokenizer, TrainingConfig};
use bytemerge_training::{BpeTrainer, StepOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    if let Some(threads) = cmd.threads {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("unable to configure rayon thread pool")?;
    }

    let config = training_config(&cmd)?;
    let corpus_path = corpus_path(&cmd)?;

    let start = Instant::now();
    let corpus = fs::read(&corpus_path)
        .with_context(|| format!("failed to read corpus {}", corpus_path.display()))?;
    log::info!(
        "Read {} bytes from {} in {:.2}s",
        corpus.len(),
        corpus_path.display(),
        start.elapsed().as_secs_f64()
    );

    let mut trainer = BpeTrainer::new(config).context("invalid training configuration")?;

    let start = Instant::now();
    trainer.load_corpus(&corpus)?;
    drop(corpus);

    let progress = progress_bar(trainer.config(), cmd.no_progress)?;
    loop {
        match trainer.step()? {
            StepOutcome::Merged(step) => {
                progress.inc(1);
                progress.set_message(format!("count {}", step.count));
            }
            StepOutcome::Stopped(_) => break,
        }
    }
    progress.finish_and_clear();
    let elapsed = start.elapsed();

    let (tokenizer, report) = Tokenizer::from_outcome(trainer.finish())?;
    let written = tokenizer
        .save(&cmd.output, cmd.format)
        .with_context(|| format!("failed to save model to {}", cmd.output.display()))?;

    println!("Training completed in {:.2}s", elapsed.as_secs_f64());
    if let Some(reason) = report.stop_reason {
        println!("  Stopped: {reason}");
    }
    println!("  Merges: {}", report.merges);
    println!("  Vocab size: {}", report.vocab_size);
    println!(
        "  Corpus: {} bytes -> {} tokens ({:.3} bytes/token)",
        report.corpus_bytes,
        report.final_tokens,
        report.compression_ratio()
    );
    println!("  Model: {}", written.display());

    Ok(())
}

/// Merge the config file (if any) with command line overrides.
fn training_config(cmd: &TrainCommand) -> AnyhowResult<TrainingConfig> {
    let mut config = match &cmd.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<TrainingConfig>(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => TrainingConfig::default(),
    };

    if let Some(vocab_size) = cmd.vocab_size {
        config.vocab_size = Some(vocab_size);
    }
    if let Some(min_frequency) = cmd.min_frequency {
        config.min_frequency = Some(min_frequency);
    }
    if cmd.no_parallel {
        config.parallel = false;
    }

    config.validate()?;
    Ok(config)
}

fn corpus_path(cmd: &TrainCommand) -> AnyhowResult<PathBuf> {
    match (&cmd.input, &cmd.data_dir) {
        (Some(input), _) => Ok(input.clone()),
        (None, Some(dir)) => Ok(dataset_corpus(dir)),
        (None, None) => anyhow::bail!("either --input or --data-dir is required"),
    }
}

fn dataset_corpus(dir: &Path) -> PathBuf {
    dir.join("train").join("train.txt")
}

fn progress_bar(config: &TrainingConfig, hidden: bool) -> AnyhowResult<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }

    let progress = match config.target_merges() {
        Some(total) => {
            let progress = ProgressBar::new(total as u64);
            progress.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos}/{len} merges {msg} [{elapsed_precise}]",
                )?
                .progress_chars("=> "),
            );
            progress
        }
        None => {
            let progress = ProgressBar::new_spinner();
            progress.set_style(ProgressStyle::with_template(
                "{spinner} {pos} merges {msg} [{elapsed_precise}]",
            )?);
            progress
        }
    };
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}
