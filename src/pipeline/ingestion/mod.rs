// Run-side extraction: run document and summary tool output

pub mod interop_summary;
pub mod run_info;

pub use interop_summary::{parse_summary_output, SummaryToolOutput, SUMMARY_TOOL_ARGS};
pub use run_info::{parse_run_info, parse_run_info_text};
