use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Malformed run document {}: {reason}", .path.display())]
    MalformedRunDocument { path: PathBuf, reason: String },

    #[error("Summary tool '{executable}' failed: {reason}")]
    SummaryToolFailure {
        executable: String,
        reason: String,
        /// Exit code of the tool, `None` when it was killed by a signal or never ran
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Summary field '{field}' has non-numeric value '{value}'")]
    SummaryParseError { field: &'static str, value: String },

    #[error("Sample sheet line {line} has no valid sequencingStartDate (got '{value}')")]
    NoStartDate { line: u64, value: String },

    #[error("Sample sheet {} is not valid UTF-8: {reason}", .path.display())]
    SheetDecoding { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("No sequencing run with id {0}")]
    UnknownRun(i64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metrics push failed: {0}")]
    MetricsPush(String),
}

impl IngestError {
    /// Sheet-level failures that send the sheet to quarantine instead of failing the process.
    pub fn is_quarantinable(&self) -> bool {
        matches!(
            self,
            IngestError::NoStartDate { .. } | IngestError::SheetDecoding { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
