use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, warn};

use seq_ingest::app::RunIngestUseCase;
use seq_ingest::config::Config;
use seq_ingest::infra::{ProcessSummaryTool, SqliteRunStore};
use seq_ingest::{logging, observability};

/// Parse a run document and its InterOp metrics, and store both in the run database.
#[derive(Parser, Debug)]
#[command(name = "ingest-run", version, about = "Parser for interop folders, inserts run summary to database")]
struct Cli {
    /// Run description document (RunInfo.xml)
    #[arg(short = 'r', long)]
    runxml: PathBuf,

    /// InterOp metrics directory handed to the summary tool
    #[arg(short = 'i', long)]
    interop: PathBuf,

    /// SQLite database file
    #[arg(short = 'd', long)]
    database: PathBuf,

    /// Summary tool executable
    #[arg(short = 'e', long)]
    executable: String,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    let _guard = logging::init_logging(&config.logging);
    observability::init_metrics(&config.metrics);

    let store = SqliteRunStore::open(&args.database)
        .with_context(|| format!("Failed to open database {}", args.database.display()))?;
    let use_case = RunIngestUseCase::new(
        Box::new(store),
        Box::new(ProcessSummaryTool::new(args.executable)),
    );

    let result = use_case.ingest(&args.runxml, &args.interop);
    if let Err(e) = observability::push_metrics("ingest-run") {
        warn!("Failed to push metrics: {}", e);
    }

    match result {
        Ok(report) => {
            println!(
                "Stored run {} (id {}) with summary",
                report.run.id, report.run_ref
            );
            Ok(())
        }
        Err(e) => {
            error!("Run ingestion failed: {}", e);
            Err(e).context("Run ingestion failed")
        }
    }
}
