use std::path::{Path, PathBuf};

use crate::domain::{Sample, SequencingRun, Summary};
use crate::error::Result;
use crate::pipeline::ingestion::SummaryToolOutput;

/// Durable store for runs and their summaries.
pub trait RunStorePort {
    /// Persist a run and return the store-assigned surrogate id.
    fn add_sequencing_run(&self, run: &SequencingRun) -> Result<i64>;
    fn add_run_summary(&self, run_ref: i64, summary: &Summary) -> Result<()>;
}

/// External summary tool, invoked once per metrics directory.
pub trait SummaryToolPort {
    fn run_summary(&self, metrics_dir: &Path) -> Result<SummaryToolOutput>;
}

// Sheet-side ports
pub trait SampleIndexPort {
    /// Create the index with its header if it does not exist yet. Never touches an existing file.
    fn ensure_index(&self) -> Result<()>;
    /// Append one row per sample, in order.
    fn append_samples(&self, samples: &[Sample]) -> Result<usize>;
}

pub trait QuarantinePort {
    fn quarantine(&self, sheet: &Path) -> Result<QuarantinedSheet>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuarantinedSheet {
    pub location: PathBuf,
    pub sha256: String,
}
