use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Two-digit-year compact date used by run documents and sample sheets (e.g. `220615`).
pub const COMPACT_DATE_FORMAT: &str = "%y%m%d";

/// Placeholder written for sample fields that are absent or empty in the sheet.
pub const NOT_AVAILABLE: &str = "NA";

/// Parse a `YYMMDD` date after trimming surrounding whitespace.
pub fn parse_compact_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), COMPACT_DATE_FORMAT).ok()
}

/// Identity and provenance of one instrument run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencingRun {
    /// Instrument-assigned run identifier
    pub id: String,
    pub number: String,
    pub flowcell: String,
    /// Instrument name
    pub sequencer: String,
    pub date: NaiveDate,
}

/// Aggregate quality metrics for one run, in the column order of the summary tool's data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub yield_total: f64,
    pub yield_q30: f64,
    pub quality_score_mean: f64,
    /// Passed through verbatim from the tool output
    pub category: String,
    pub count: i64,
    pub error_rate: f64,
}

/// Columns read from a sample sheet, together with their default policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleColumn {
    ExternalSampleId,
    Sequencer,
    Run,
    Flowcell,
    SequencingStartDate,
    Project,
    CapturingKit,
}

impl SampleColumn {
    pub const ALL: [SampleColumn; 7] = [
        SampleColumn::ExternalSampleId,
        SampleColumn::Sequencer,
        SampleColumn::Run,
        SampleColumn::Flowcell,
        SampleColumn::SequencingStartDate,
        SampleColumn::Project,
        SampleColumn::CapturingKit,
    ];

    /// Header name in the sample sheet
    pub fn header(self) -> &'static str {
        match self {
            SampleColumn::ExternalSampleId => "externalSampleID",
            SampleColumn::Sequencer => "sequencer",
            SampleColumn::Run => "run",
            SampleColumn::Flowcell => "flowcell",
            SampleColumn::SequencingStartDate => "sequencingStartDate",
            SampleColumn::Project => "project",
            SampleColumn::CapturingKit => "capturingKit",
        }
    }

    /// Value substituted when the column is missing or the cell is empty.
    /// `None` means the column is mandatory and has no fallback.
    pub fn default_value(self) -> Option<&'static str> {
        match self {
            SampleColumn::SequencingStartDate => None,
            _ => Some(NOT_AVAILABLE),
        }
    }
}

/// One row of a validated sample sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub external_sample_id: String,
    pub sequencer: String,
    pub run: String,
    pub flowcell: String,
    pub sequencing_start_date: NaiveDate,
    pub project: String,
    pub capturing_kit: String,
}

impl Sample {
    /// Row for the sample index, in `SAMPLE_INDEX_HEADER` order.
    /// Gender and prep kit are not part of a sample sheet and are always `NA`.
    pub fn to_index_row(&self) -> [String; 7] {
        [
            self.external_sample_id.clone(),
            NOT_AVAILABLE.to_string(),
            self.sequencing_start_date.format("%Y-%m-%d").to_string(),
            self.sequencer.clone(),
            NOT_AVAILABLE.to_string(),
            self.capturing_kit.clone(),
            self.project.clone(),
        ]
    }
}

/// Canonical header of the sample index file.
pub const SAMPLE_INDEX_HEADER: [&str; 7] = [
    "externalSampleID",
    "Gender",
    "sequencingStartDate",
    "sequencer",
    "prepKit",
    "capturingKit",
    "project",
];

/// Input sheet, output index and quarantine directory for one sheet-processing call.
#[derive(Debug, Clone)]
pub struct FilesAndFailDir {
    input: PathBuf,
    output: PathBuf,
    fail: PathBuf,
}

impl FilesAndFailDir {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, fail: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            fail: fail.into(),
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn fail_location(&self) -> &Path {
        &self.fail
    }
}
