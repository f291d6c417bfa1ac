// Adapters behind the application ports

pub mod in_memory_run_store;
pub mod quarantine_adapter;
pub mod sample_index_adapter;
pub mod sqlite_run_store;
pub mod summary_tool_adapter;

pub use in_memory_run_store::InMemoryRunStore;
pub use quarantine_adapter::FsQuarantine;
pub use sample_index_adapter::CsvSampleIndex;
pub use sqlite_run_store::SqliteRunStore;
pub use summary_tool_adapter::ProcessSummaryTool;
