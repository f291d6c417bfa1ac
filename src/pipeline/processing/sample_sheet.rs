//! Sample sheet validation.
//!
//! A sheet is one atomic submission: if any row lacks a parsable `sequencingStartDate`, or the
//! file is not valid UTF-8, the whole sheet is rejected and no samples are returned. Rows are
//! returned in file order.

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::domain::{parse_compact_date, Sample, SampleColumn};
use crate::error::{IngestError, Result};

pub fn parse_sample_sheet(path: &Path) -> Result<Vec<Sample>> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|e| IngestError::SheetDecoding {
        path: path.to_path_buf(),
        reason: e.utf8_error().to_string(),
    })?;
    parse_sample_sheet_text(&text)
}

pub fn parse_sample_sheet_text(text: &str) -> Result<Vec<Sample>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .flexible(true)
        .from_reader(text.as_bytes());

    // Later duplicates of a header name win
    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), idx))
        .collect();

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let sample = sample_from_record(&record, &columns)?;
        debug!(sample = %sample.external_sample_id, date = %sample.sequencing_start_date, "Validated sample row");
        samples.push(sample);
    }
    Ok(samples)
}

fn sample_from_record(record: &StringRecord, columns: &HashMap<String, usize>) -> Result<Sample> {
    let raw_date = cell(record, columns, SampleColumn::SequencingStartDate).unwrap_or("");
    let sequencing_start_date =
        parse_compact_date(raw_date).ok_or_else(|| IngestError::NoStartDate {
            line: record.position().map(|p| p.line()).unwrap_or_default(),
            value: raw_date.to_string(),
        })?;

    Ok(Sample {
        external_sample_id: field(record, columns, SampleColumn::ExternalSampleId),
        sequencer: field(record, columns, SampleColumn::Sequencer),
        run: field(record, columns, SampleColumn::Run),
        flowcell: field(record, columns, SampleColumn::Flowcell),
        sequencing_start_date,
        project: field(record, columns, SampleColumn::Project),
        capturing_kit: field(record, columns, SampleColumn::CapturingKit),
    })
}

fn cell<'r>(
    record: &'r StringRecord,
    columns: &HashMap<String, usize>,
    column: SampleColumn,
) -> Option<&'r str> {
    columns
        .get(column.header())
        .and_then(|&idx| record.get(idx))
}

/// Cell value, or the column's default when the column is absent or the cell is empty.
fn field(record: &StringRecord, columns: &HashMap<String, usize>, column: SampleColumn) -> String {
    match cell(record, columns, column) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => column.default_value().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str =
        "externalSampleID,sequencer,run,flowcell,sequencingStartDate,project,capturingKit";

    #[test]
    fn test_valid_sheet_keeps_order() {
        let text = format!(
            "{HEADER}\nS1,illumina,R1,FC1,220101,P1,KitA\nS2,illumina,R1,FC1,220102,P2,KitB\n"
        );
        let samples = parse_sample_sheet_text(&text).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].external_sample_id, "S1");
        assert_eq!(
            samples[0].sequencing_start_date,
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
        );
        assert_eq!(samples[1].external_sample_id, "S2");
        assert_eq!(samples[1].project, "P2");
        assert_eq!(samples[1].capturing_kit, "KitB");
    }

    #[test]
    fn test_missing_and_empty_fields_default_to_na() {
        let text = "externalSampleID,sequencingStartDate,project\n,220101,P1\n";
        let samples = parse_sample_sheet_text(text).unwrap();
        let sample = &samples[0];
        assert_eq!(sample.external_sample_id, "NA");
        assert_eq!(sample.sequencer, "NA");
        assert_eq!(sample.run, "NA");
        assert_eq!(sample.flowcell, "NA");
        assert_eq!(sample.project, "P1");
        assert_eq!(sample.capturing_kit, "NA");
    }

    #[test]
    fn test_start_date_is_trimmed() {
        let text = "externalSampleID,sequencingStartDate\nS1, 220615 \n";
        let samples = parse_sample_sheet_text(text).unwrap();
        assert_eq!(
            samples[0].sequencing_start_date,
            NaiveDate::from_ymd_opt(2022, 6, 15).unwrap()
        );
    }

    #[test]
    fn test_one_bad_date_rejects_whole_sheet() {
        let text = format!(
            "{HEADER}\nS1,illumina,R1,FC1,220101,P1,KitA\nS2,illumina,R1,FC1,bad-date,P1,KitA\n"
        );
        match parse_sample_sheet_text(&text) {
            Err(IngestError::NoStartDate { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "bad-date");
            }
            other => panic!("expected NoStartDate, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_date_is_not_defaulted() {
        let text = format!("{HEADER}\nS1,illumina,R1,FC1,,P1,KitA\n");
        assert!(matches!(
            parse_sample_sheet_text(&text),
            Err(IngestError::NoStartDate { .. })
        ));
    }

    #[test]
    fn test_missing_date_column() {
        let text = "externalSampleID,project\nS1,P1\n";
        assert!(matches!(
            parse_sample_sheet_text(text),
            Err(IngestError::NoStartDate { .. })
        ));
    }

    #[test]
    fn test_short_row_treats_missing_cells_as_absent() {
        let text = "sequencingStartDate,externalSampleID,project\n220101,S1\n";
        let samples = parse_sample_sheet_text(text).unwrap();
        assert_eq!(samples[0].external_sample_id, "S1");
        assert_eq!(samples[0].project, "NA");
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let samples = parse_sample_sheet_text(&format!("{HEADER}\n")).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_a_decoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        let mut bytes = format!("{HEADER}\nS").into_bytes();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b",illumina,R1,FC1,220101,P1,KitA\n");
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            parse_sample_sheet(&path),
            Err(IngestError::SheetDecoding { .. })
        ));
    }
}
