//! Run document (RunInfo XML) extraction.
//!
//! The document root carries a `Number` attribute and a `Run` child with `Id` and `Number`
//! attributes and `Flowcell`, `Instrument` and `Date` child elements. Everything else in the
//! document (read layout, tiles, ...) is ignored.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::domain::{parse_compact_date, SequencingRun};
use crate::error::{IngestError, Result};

#[derive(Debug, Deserialize)]
struct RunInfoXml {
    // Legacy top-level run number. Read for completeness, never used in the record.
    #[serde(rename = "@Number")]
    _number: Option<String>,
    #[serde(rename = "Run")]
    run: Option<RunXml>,
}

#[derive(Debug, Deserialize)]
struct RunXml {
    #[serde(rename = "@Id")]
    id: Option<String>,
    #[serde(rename = "@Number")]
    number: Option<String>,
    #[serde(rename = "Flowcell", default)]
    flowcell: Vec<String>,
    #[serde(rename = "Instrument", default)]
    instrument: Vec<String>,
    #[serde(rename = "Date", default)]
    date: Vec<String>,
}

pub fn parse_run_info(path: &Path) -> Result<SequencingRun> {
    let text = std::fs::read_to_string(path)?;
    parse_run_info_text(&text, path)
}

/// Parse run document text. `path` is only used to label errors.
pub fn parse_run_info_text(xml: &str, path: &Path) -> Result<SequencingRun> {
    let malformed = |reason: String| IngestError::MalformedRunDocument {
        path: path.to_path_buf(),
        reason,
    };

    let parsed: RunInfoXml =
        quick_xml::de::from_str(xml).map_err(|e| malformed(format!("unparsable XML: {e}")))?;
    let run = parsed
        .run
        .ok_or_else(|| malformed("missing Run element".to_string()))?;

    let id = non_empty(run.id).ok_or_else(|| malformed("Run has no Id attribute".to_string()))?;
    let number =
        non_empty(run.number).ok_or_else(|| malformed("Run has no Number attribute".to_string()))?;
    let flowcell = first_child(run.flowcell, "Flowcell").map_err(&malformed)?;
    let sequencer = first_child(run.instrument, "Instrument").map_err(&malformed)?;
    let date_text = first_child(run.date, "Date").map_err(&malformed)?;
    let date = parse_compact_date(&date_text)
        .ok_or_else(|| malformed(format!("Date '{}' is not YYMMDD", date_text.trim())))?;

    debug!(run_id = %id, %flowcell, %sequencer, %date, "Parsed run document");

    Ok(SequencingRun {
        id,
        number,
        flowcell,
        sequencer,
        date,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn first_child(values: Vec<String>, tag: &str) -> std::result::Result<String, String> {
    values
        .into_iter()
        .next()
        .ok_or_else(|| format!("Run has no {tag} element"))
}
