use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::app::ports::RunStorePort;
use crate::domain::{SequencingRun, Summary};
use crate::error::{IngestError, Result};

/// In-memory run store for development/testing. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryRunStore {
    runs: Arc<Mutex<BTreeMap<i64, SequencingRun>>>,
    summaries: Arc<Mutex<Vec<(i64, Summary)>>>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> Vec<(i64, SequencingRun)> {
        let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        runs.iter().map(|(id, run)| (*id, run.clone())).collect()
    }

    pub fn summaries(&self) -> Vec<(i64, Summary)> {
        self.summaries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl RunStorePort for InMemoryRunStore {
    fn add_sequencing_run(&self, run: &SequencingRun) -> Result<i64> {
        let mut runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        let id = runs.keys().next_back().map_or(1, |last| last + 1);
        runs.insert(id, run.clone());
        Ok(id)
    }

    fn add_run_summary(&self, run_ref: i64, summary: &Summary) -> Result<()> {
        let runs = self.runs.lock().unwrap_or_else(|e| e.into_inner());
        if !runs.contains_key(&run_ref) {
            return Err(IngestError::UnknownRun(run_ref));
        }
        self.summaries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((run_ref, summary.clone()));
        Ok(())
    }
}
