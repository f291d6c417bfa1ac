// Observability: metrics

pub mod metrics;

pub use metrics::{init_metrics, push_metrics};
