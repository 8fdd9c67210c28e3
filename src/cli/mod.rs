//! Command-line interface for quizvoice.
//!
//! Provides commands for running a batch, retrying failed ordinals,
//! inspecting the persisted progress, and listing synthesis voices.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::{EdgeTtsAdapter, Synthesizer};
use crate::config::{SpeechConfig, Strategy};
use crate::core::{BatchOrchestrator, BatchReport, ProgressStore, RandomPacing};

/// quizvoice - resumable Q&A corpus to speech batch pipeline
#[derive(Parser, Debug)]
#[command(name = "quizvoice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a corpus into per-question audio artifacts
    Run {
        /// Input markdown corpus
        input: PathBuf,

        /// Output directory (also holds the progress record)
        output: PathBuf,

        /// Units per batch, e.g. "3-5"
        #[arg(long, value_parser = parse_usize_range)]
        batch_size: Option<(usize, usize)>,

        /// Minutes between batches, e.g. "5-15"
        #[arg(long, value_parser = parse_f64_range)]
        interval: Option<(f64, f64)>,

        /// Text rendering strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Speech configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Re-attempt the ordinals recorded as failed
    Retry {
        /// Input markdown corpus
        input: PathBuf,

        /// Output directory of the interrupted run
        output: PathBuf,

        /// Speech configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the persisted batch progress
    Status {
        /// Output directory of the run
        output: PathBuf,
    },

    /// List voices available from the synthesis engine
    Voices {
        /// Locale prefix to filter by
        #[arg(long, default_value = "zh-CN")]
        locale: String,
    },
}

/// Rendering strategy for the CLI (maps to config::Strategy)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Punctuation-paced plain text
    Plain,

    /// Structured speech markup
    Markup,
}

impl From<StrategyArg> for Strategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Plain => Strategy::Plain,
            StrategyArg::Markup => Strategy::Markup,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run {
                input,
                output,
                batch_size,
                interval,
                strategy,
                config,
            } => run_batch(input, output, batch_size, interval, strategy, config).await,
            Commands::Retry {
                input,
                output,
                config,
            } => retry_failed(input, output, config).await,
            Commands::Status { output } => show_status(output).await,
            Commands::Voices { locale } => list_voices(&locale).await,
        }
    }
}

/// Parse an inclusive "min-max" range of whole numbers
fn parse_usize_range(s: &str) -> Result<(usize, usize), String> {
    let (min, max) = split_range(s)?;
    let min: usize = min.parse().map_err(|_| format!("invalid number: {min}"))?;
    let max: usize = max.parse().map_err(|_| format!("invalid number: {max}"))?;
    if min == 0 || min > max {
        return Err(format!("range must satisfy 1 <= min <= max, got {s}"));
    }
    Ok((min, max))
}

/// Parse an inclusive "min-max" range of minutes
fn parse_f64_range(s: &str) -> Result<(f64, f64), String> {
    let (min, max) = split_range(s)?;
    let min: f64 = min.parse().map_err(|_| format!("invalid number: {min}"))?;
    let max: f64 = max.parse().map_err(|_| format!("invalid number: {max}"))?;
    if min < 0.0 || min > max {
        return Err(format!("range must satisfy 0 <= min <= max, got {s}"));
    }
    Ok((min, max))
}

fn split_range(s: &str) -> Result<(&str, &str), String> {
    s.split_once('-')
        .map(|(min, max)| (min.trim(), max.trim()))
        .ok_or_else(|| format!("expected \"min-max\", got {s}"))
}

/// Build the effective configuration from file plus flag overrides
fn effective_config(
    config_path: Option<PathBuf>,
    batch_size: Option<(usize, usize)>,
    interval: Option<(f64, f64)>,
    strategy: Option<StrategyArg>,
) -> Result<SpeechConfig> {
    let mut config = SpeechConfig::load(config_path.as_deref())?;
    if let Some(batch_size) = batch_size {
        config.pacing.batch_size = batch_size;
    }
    if let Some(interval) = interval {
        config.pacing.interval_minutes = interval;
    }
    if let Some(strategy) = strategy {
        config.strategy = strategy.into();
    }
    Ok(config)
}

fn build_orchestrator(config: SpeechConfig, output: &std::path::Path) -> BatchOrchestrator {
    let pacing = Box::new(RandomPacing::from_config(&config.pacing));
    let synthesizer = Arc::new(EdgeTtsAdapter::new());
    BatchOrchestrator::new(config, synthesizer, pacing, output)
}

/// Run the batch to completion, resuming any existing checkpoint
async fn run_batch(
    input: PathBuf,
    output: PathBuf,
    batch_size: Option<(usize, usize)>,
    interval: Option<(f64, f64)>,
    strategy: Option<StrategyArg>,
    config: Option<PathBuf>,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file '{}' does not exist", input.display());
    }

    let config = effective_config(config, batch_size, interval, strategy)?;
    let mut orchestrator = build_orchestrator(config, &output);
    let report = orchestrator.run(&input).await?;

    print_report(&report);
    Ok(())
}

/// Re-attempt only the failed ordinals from a previous run
async fn retry_failed(input: PathBuf, output: PathBuf, config: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file '{}' does not exist", input.display());
    }

    let config = effective_config(config, None, None, None)?;
    let mut orchestrator = build_orchestrator(config, &output);
    let report = orchestrator.retry_failed(&input).await?;

    println!(
        "Recovered {} ordinal(s); {} still failed",
        report.processed,
        report.failed.len()
    );
    if !report.failed.is_empty() {
        println!("Still failed: {:?}", report.failed);
    }
    Ok(())
}

/// Print the persisted progress record, if any
async fn show_status(output: PathBuf) -> Result<()> {
    let store = ProgressStore::new(&output);
    match store.load().await.context("Failed to read progress record")? {
        Some(record) => {
            println!(
                "Processed: {}/{}",
                record.processed_questions, record.total_questions
            );
            println!("Completed batches: {}", record.completed_batches);
            if let Some(start) = record.start_time {
                println!("Started: {}", start.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(last) = record.last_batch_time {
                println!("Last batch: {}", last.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if record.failed_questions.is_empty() {
                println!("Failed: none");
            } else {
                println!("Failed: {:?}", record.failed_questions);
            }
        }
        None => println!("No progress record under {}", output.display()),
    }
    Ok(())
}

/// List the voices the synthesis engine offers for a locale
async fn list_voices(locale: &str) -> Result<()> {
    let adapter = EdgeTtsAdapter::new();
    let voices = adapter
        .list_voices(locale)
        .await
        .context("Failed to list voices")?;

    if voices.is_empty() {
        println!("No voices found for locale {locale}");
        return Ok(());
    }

    for voice in &voices {
        println!("{:<36} {}", voice.name, voice.gender);
    }
    println!("\n{} voice(s) for locale {}", voices.len(), locale);
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!(
        "Processed {}/{} question(s) in {} batch(es)",
        report.processed, report.total, report.batches
    );
    let secs = report.elapsed.num_seconds();
    println!("Elapsed: {}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60);
    if report.failed.is_empty() {
        println!("Failed: none");
    } else {
        println!("Failed ordinal(s): {:?}", report.failed);
    }
}
