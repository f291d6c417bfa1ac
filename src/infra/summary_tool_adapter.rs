use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::app::ports::SummaryToolPort;
use crate::error::{IngestError, Result};
use crate::pipeline::ingestion::{SummaryToolOutput, SUMMARY_TOOL_ARGS};

/// Runs the vendor summary executable as a blocking subprocess.
///
/// Invoked as `<executable> <metrics-dir> --level=0 --csv=1`. No timeout is applied.
pub struct ProcessSummaryTool {
    executable: String,
}

impl ProcessSummaryTool {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn failure(&self, reason: String, exit_code: Option<i32>, stderr: String) -> IngestError {
        IngestError::SummaryToolFailure {
            executable: self.executable.clone(),
            reason,
            exit_code,
            stderr,
        }
    }
}

impl SummaryToolPort for ProcessSummaryTool {
    fn run_summary(&self, metrics_dir: &Path) -> Result<SummaryToolOutput> {
        info!(executable = %self.executable, metrics_dir = %metrics_dir.display(), "Running summary tool");
        let output = Command::new(&self.executable)
            .arg(metrics_dir)
            .args(SUMMARY_TOOL_ARGS)
            .output()
            .map_err(|e| {
                let reason = if e.kind() == ErrorKind::NotFound {
                    "executable not found".to_string()
                } else {
                    format!("could not start: {e}")
                };
                self.failure(reason, None, String::new())
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(self.failure(
                format!("exited with {}", output.status),
                output.status.code(),
                stderr,
            ));
        }
        debug!(stdout_bytes = stdout.len(), stderr_bytes = stderr.len(), "Summary tool finished");

        Ok(SummaryToolOutput {
            executable: self.executable.clone(),
            stdout,
            stderr,
        })
    }
}
