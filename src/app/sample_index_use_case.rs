use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};

use crate::app::ports::{QuarantinePort, SampleIndexPort};
use crate::error::{IngestError, Result};
use crate::observability::metrics::sample_index;
use crate::pipeline::processing::parse_sample_sheet;

/// Terminal state of one sample sheet. Both variants count as a successful run.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetOutcome {
    Indexed { samples: usize },
    Quarantined { location: PathBuf, sha256: String, reason: String },
}

/// Use case for indexing one sample sheet, or quarantining it when it fails validation.
///
/// Exactly one of index-append or quarantine-copy happens per sheet. Validation covers the
/// whole sheet before anything is appended, so a rejected sheet never leaves rows behind.
pub struct SampleIndexUseCase {
    index: Box<dyn SampleIndexPort>,
    quarantine: Box<dyn QuarantinePort>,
}

impl SampleIndexUseCase {
    pub fn new(index: Box<dyn SampleIndexPort>, quarantine: Box<dyn QuarantinePort>) -> Self {
        Self { index, quarantine }
    }

    pub fn process_sheet(&self, sheet: &Path) -> Result<SheetOutcome> {
        let span = info_span!("index_samples", sheet = %sheet.display());
        let _enter = span.enter();

        self.index.ensure_index()?;

        match parse_sample_sheet(sheet) {
            Ok(samples) => {
                let written = self.index.append_samples(&samples)?;
                sample_index::sheet_indexed(written);
                info!(samples = written, "Indexed sample sheet");
                Ok(SheetOutcome::Indexed { samples: written })
            }
            Err(e) if e.is_quarantinable() => {
                let quarantined = self.quarantine.quarantine(sheet)?;
                sample_index::sheet_quarantined(quarantine_reason(&e));
                warn!(
                    location = %quarantined.location.display(),
                    sha256 = %quarantined.sha256,
                    "Quarantined sample sheet: {}", e
                );
                Ok(SheetOutcome::Quarantined {
                    location: quarantined.location,
                    sha256: quarantined.sha256,
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

fn quarantine_reason(e: &IngestError) -> &'static str {
    match e {
        IngestError::SheetDecoding { .. } => "decoding",
        _ => "no_start_date",
    }
}
