use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use seq_ingest::app::{SampleIndexUseCase, SheetOutcome};
use seq_ingest::config::Config;
use seq_ingest::domain::FilesAndFailDir;
use seq_ingest::infra::{CsvSampleIndex, FsQuarantine};
use seq_ingest::{logging, observability};

/// Validate a sample sheet and append it to the sample index, or quarantine it.
#[derive(Parser, Debug)]
#[command(name = "index-samples", version, about = "Parses sample sheet and adds to output file")]
struct Cli {
    /// Sample sheet to read
    #[arg(short = 'i', long, value_name = "path/to/input")]
    input: PathBuf,

    /// File to add results to
    #[arg(short = 'o', long, value_name = "path/to/output")]
    output: PathBuf,

    /// Directory to store failed samples
    #[arg(short = 'f', long, value_name = "path/to/failedSamplesDirectory")]
    faildirectory: PathBuf,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Cli::parse();
    let files = FilesAndFailDir::new(args.input, args.output, args.faildirectory);

    let config = Config::load().context("Failed to load configuration")?;
    let _guard = logging::init_logging(&config.logging);
    observability::init_metrics(&config.metrics);

    let use_case = SampleIndexUseCase::new(
        Box::new(CsvSampleIndex::new(files.output())),
        Box::new(FsQuarantine::new(files.fail_location())),
    );

    let result = use_case.process_sheet(files.input());
    if let Err(e) = observability::push_metrics("index-samples") {
        warn!("Failed to push metrics: {}", e);
    }

    // Quarantine is a normal outcome; only I/O failures outside validation exit non-zero
    let outcome = result
        .with_context(|| format!("Failed to process sample sheet {}", files.input().display()))?;
    match outcome {
        SheetOutcome::Indexed { samples } => {
            println!("Indexed {} samples into {}", samples, files.output().display());
        }
        SheetOutcome::Quarantined { location, reason, .. } => {
            println!("Quarantined sheet to {}: {}", location.display(), reason);
        }
    }
    Ok(())
}
