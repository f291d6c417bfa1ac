pub mod ports;
pub mod run_ingest_use_case;
pub mod sample_index_use_case;

pub use run_ingest_use_case::{RunIngestReport, RunIngestUseCase};
pub use sample_index_use_case::{SampleIndexUseCase, SheetOutcome};
