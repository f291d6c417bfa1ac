//! Parsing of the vendor summary tool's aggregate (`--level=0 --csv=1`) output.
//!
//! The data row is the third line of the output. Its first field is a label; the remaining
//! fields map by position onto [`Summary`].

use tracing::debug;

use crate::domain::Summary;
use crate::error::{IngestError, Result};

/// Arguments appended after the metrics directory when invoking the summary tool.
pub const SUMMARY_TOOL_ARGS: [&str; 2] = ["--level=0", "--csv=1"];

const MIN_OUTPUT_LINES: usize = 4;
const DATA_ROW_INDEX: usize = 2;
const SUMMARY_FIELDS: [&str; 6] = [
    "yield_total",
    "yield_q30",
    "quality_score_mean",
    "category",
    "count",
    "error_rate",
];

/// Captured result of one successful summary tool invocation.
#[derive(Debug, Clone)]
pub struct SummaryToolOutput {
    pub executable: String,
    pub stdout: String,
    pub stderr: String,
}

pub fn parse_summary_output(output: &SummaryToolOutput) -> Result<Summary> {
    let shape_error = |reason: String| IngestError::SummaryToolFailure {
        executable: output.executable.clone(),
        reason,
        exit_code: Some(0),
        stderr: output.stderr.clone(),
    };

    let lines: Vec<&str> = output.stdout.trim().lines().collect();
    if lines.len() < MIN_OUTPUT_LINES {
        return Err(shape_error(format!(
            "expected at least {MIN_OUTPUT_LINES} output lines, got {}",
            lines.len()
        )));
    }

    let row = lines[DATA_ROW_INDEX].trim_end_matches('\r');
    let fields: Vec<&str> = row.split(',').skip(1).collect();
    if fields.len() < SUMMARY_FIELDS.len() {
        return Err(shape_error(format!(
            "expected at least {} fields after the label in '{row}', got {}",
            SUMMARY_FIELDS.len(),
            fields.len()
        )));
    }
    debug!(row, "Summary data row");

    Ok(Summary {
        yield_total: parse_float(SUMMARY_FIELDS[0], fields[0])?,
        yield_q30: parse_float(SUMMARY_FIELDS[1], fields[1])?,
        quality_score_mean: parse_float(SUMMARY_FIELDS[2], fields[2])?,
        category: fields[3].to_string(),
        count: parse_int(SUMMARY_FIELDS[4], fields[4])?,
        error_rate: parse_float(SUMMARY_FIELDS[5], fields[5])?,
    })
}

fn parse_float(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| IngestError::SummaryParseError {
            field,
            value: value.to_string(),
        })
}

fn parse_int(field: &'static str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| IngestError::SummaryParseError {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str) -> SummaryToolOutput {
        SummaryToolOutput {
            executable: "summary".to_string(),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_parse_summary_output() {
        let stdout = "# Version: v1.1.4\n\
                      Level,Yield,Q30 Yield,Mean QScore,Group,Reads,Error Rate\n\
                      Total,120.5,110.25,35.7,Nonindexed,400123,0.42\n\
                      Extra,0,0,0,x,0,0\n";
        let summary = parse_summary_output(&output(stdout)).unwrap();
        assert_eq!(
            summary,
            Summary {
                yield_total: 120.5,
                yield_q30: 110.25,
                quality_score_mean: 35.7,
                category: "Nonindexed".to_string(),
                count: 400123,
                error_rate: 0.42,
            }
        );
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let stdout = "h\nh\nTotal,1,2,3,cat,4,5,6,7\nfooter\n";
        let summary = parse_summary_output(&output(stdout)).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.error_rate, 5.0);
    }

    #[test]
    fn test_too_few_lines() {
        let err = parse_summary_output(&output("a\nb\nTotal,1,2,3,c,4,5\n")).unwrap_err();
        assert!(matches!(err, IngestError::SummaryToolFailure { .. }));
    }

    #[test]
    fn test_too_few_fields() {
        let err = parse_summary_output(&output("a\nb\nTotal,1,2,3\nd\n")).unwrap_err();
        assert!(matches!(err, IngestError::SummaryToolFailure { .. }));
    }

    #[test]
    fn test_non_numeric_field() {
        let err = parse_summary_output(&output("a\nb\nTotal,1,2,3,c,many,5\nd\n")).unwrap_err();
        match err {
            IngestError::SummaryParseError { field, value } => {
                assert_eq!(field, "count");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_float_count_is_rejected() {
        let err = parse_summary_output(&output("a\nb\nTotal,1,2,3,c,4.5,5\nd\n")).unwrap_err();
        assert!(matches!(err, IngestError::SummaryParseError { field: "count", .. }));
    }
}
