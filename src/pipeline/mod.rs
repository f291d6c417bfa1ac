// Extraction and validation stages shared by the run and sample sheet pipelines

pub mod ingestion;
pub mod processing;
