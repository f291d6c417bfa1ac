// Sample-side validation

pub mod sample_sheet;

pub use sample_sheet::{parse_sample_sheet, parse_sample_sheet_text};
