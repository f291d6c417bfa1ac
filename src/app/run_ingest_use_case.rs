use std::path::Path;
use tracing::{error, info, info_span};

use crate::app::ports::{RunStorePort, SummaryToolPort};
use crate::domain::{SequencingRun, Summary};
use crate::error::{IngestError, Result};
use crate::observability::metrics::run_ingest;
use crate::pipeline::ingestion::{parse_run_info, parse_summary_output};

/// Use case for persisting one instrument run together with its quality summary.
///
/// The run is written first because the summary is keyed by the run's surrogate id. The two
/// writes are not wrapped in a transaction: a failure after the run write leaves the run
/// without a summary, and nothing compensates for that.
pub struct RunIngestUseCase {
    store: Box<dyn RunStorePort>,
    summary_tool: Box<dyn SummaryToolPort>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunIngestReport {
    pub run_ref: i64,
    pub run: SequencingRun,
    pub summary: Summary,
}

impl RunIngestUseCase {
    pub fn new(store: Box<dyn RunStorePort>, summary_tool: Box<dyn SummaryToolPort>) -> Self {
        Self {
            store,
            summary_tool,
        }
    }

    pub fn ingest(&self, run_document: &Path, metrics_dir: &Path) -> Result<RunIngestReport> {
        let span = info_span!("ingest_run", document = %run_document.display());
        let _enter = span.enter();

        let run = parse_run_info(run_document)?;
        let run_ref = self.store.add_sequencing_run(&run)?;
        run_ingest::run_ingested();
        info!(run_id = %run.id, run_ref, "Stored sequencing run");

        let summary = self.extract_summary(metrics_dir).inspect_err(|e| {
            error!(run_ref, "Run stored without summary: {}", e);
        })?;
        self.store.add_run_summary(run_ref, &summary)?;
        run_ingest::summary_stored();
        info!(run_ref, yield_total = summary.yield_total, "Stored run summary");

        Ok(RunIngestReport {
            run_ref,
            run,
            summary,
        })
    }

    fn extract_summary(&self, metrics_dir: &Path) -> Result<Summary> {
        let result = self
            .summary_tool
            .run_summary(metrics_dir)
            .and_then(|output| parse_summary_output(&output));
        match &result {
            Err(IngestError::SummaryToolFailure { .. }) => run_ingest::summary_tool_failed("tool"),
            Err(IngestError::SummaryParseError { .. }) => run_ingest::summary_tool_failed("parse"),
            _ => {}
        }
        result
    }
}
