//! Counters for the run and sample sheet pipelines
//!
//! Recording goes through the `metrics` facade. Without an installed recorder every call is a
//! no-op, so the pipelines record unconditionally. Both binaries are one-shot, so the usual
//! export is a single push to a Pushgateway just before exit.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::net::SocketAddr;
use std::sync::{Once, OnceLock};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::MetricsConfig;
use crate::error::{IngestError, Result};

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Run ingestion
    RunsIngested,
    SummariesStored,
    SummaryToolFailures,

    // Sample index
    SheetsIndexed,
    SamplesIndexed,
    SheetsQuarantined,
}

impl MetricName {
    pub const ALL: [MetricName; 6] = [
        MetricName::RunsIngested,
        MetricName::SummariesStored,
        MetricName::SummaryToolFailures,
        MetricName::SheetsIndexed,
        MetricName::SamplesIndexed,
        MetricName::SheetsQuarantined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RunsIngested => "seq_ingest_runs_ingested_total",
            MetricName::SummariesStored => "seq_ingest_summaries_stored_total",
            MetricName::SummaryToolFailures => "seq_ingest_summary_tool_failures_total",
            MetricName::SheetsIndexed => "seq_ingest_sheets_indexed_total",
            MetricName::SamplesIndexed => "seq_ingest_samples_indexed_total",
            MetricName::SheetsQuarantined => "seq_ingest_sheets_quarantined_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static INIT: Once = Once::new();
static PUSH_STATE: OnceLock<PushState> = OnceLock::new();

const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

struct PushState {
    handle: PrometheusHandle,
    pushgateway_url: String,
    job: String,
}

/// Install a Prometheus recorder. Idempotent, and a no-op when nothing is configured.
///
/// With a Pushgateway URL the recorder is kept for [`push_metrics`], which the binaries call once
/// before exiting. Otherwise an HTTP scrape listener is started on `listen_addr`.
pub fn init_metrics(config: &MetricsConfig) {
    if config.pushgateway_url.is_none() && config.listen_addr.is_none() {
        return;
    }
    INIT.call_once(|| {
        if let Some(pushgateway_url) = config.pushgateway_url.as_deref() {
            match PrometheusBuilder::new().install_recorder() {
                Ok(handle) => {
                    PUSH_STATE
                        .set(PushState {
                            handle,
                            pushgateway_url: pushgateway_url.to_string(),
                            job: config.job.clone(),
                        })
                        .ok();
                    info!("Metrics recorder installed, pushing to {}", pushgateway_url);
                }
                Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
            }
            return;
        }

        let Some(addr_str) = config.listen_addr.as_deref() else {
            return;
        };
        let addr = match addr_str.parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(e) => {
                warn!("Invalid metrics addr '{}': {}", addr_str, e);
                return;
            }
        };
        match PrometheusBuilder::new().with_http_listener(addr).install() {
            Ok(()) => info!("Prometheus HTTP exporter started at http://{}/metrics", addr),
            Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
        }
    });
}

/// Grouping URL for one job/instance pair on a Pushgateway.
pub fn push_url(pushgateway_url: &str, job: &str, instance: &str) -> String {
    format!(
        "{}/metrics/job/{}/instance/{}",
        pushgateway_url.trim_end_matches('/'),
        job,
        instance
    )
}

/// Push everything recorded so far to the configured Pushgateway.
///
/// Returns `Ok(false)` when no Pushgateway is configured.
pub fn push_metrics(instance: &str) -> Result<bool> {
    let Some(state) = PUSH_STATE.get() else {
        return Ok(false);
    };
    let url = push_url(&state.pushgateway_url, &state.job, instance);
    let body = state.handle.render();

    let client = reqwest::blocking::Client::builder()
        .timeout(PUSH_TIMEOUT)
        .build()?;
    let response = client
        .post(&url)
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(body)
        .send()?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().unwrap_or_default();
        return Err(IngestError::MetricsPush(format!(
            "Pushgateway returned status {}: {}",
            status, text
        )));
    }
    info!("Pushed metrics to {}", url);
    Ok(true)
}

pub mod run_ingest {
    use super::MetricName;

    pub fn run_ingested() {
        ::metrics::counter!(MetricName::RunsIngested.as_str()).increment(1);
    }

    pub fn summary_stored() {
        ::metrics::counter!(MetricName::SummariesStored.as_str()).increment(1);
    }

    pub fn summary_tool_failed(kind: &'static str) {
        ::metrics::counter!(MetricName::SummaryToolFailures.as_str(), "kind" => kind).increment(1);
    }
}

pub mod sample_index {
    use super::MetricName;

    pub fn sheet_indexed(samples: usize) {
        ::metrics::counter!(MetricName::SheetsIndexed.as_str()).increment(1);
        ::metrics::counter!(MetricName::SamplesIndexed.as_str()).increment(samples as u64);
    }

    pub fn sheet_quarantined(reason: &'static str) {
        ::metrics::counter!(MetricName::SheetsQuarantined.as_str(), "reason" => reason).increment(1);
    }
}
