use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

pub const CONFIG_PATH_ENV: &str = "SEQ_INGEST_CONFIG";
pub const METRICS_ADDR_ENV: &str = "SEQ_INGEST_METRICS_ADDR";
pub const PUSHGATEWAY_URL_ENV: &str = "SEQ_INGEST_PUSHGATEWAY_URL";
const DEFAULT_CONFIG_PATH: &str = "seq_ingest.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the daily-rotated JSON log
    pub directory: PathBuf,
    pub file_name: String,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "seq_ingest.log".to_string(),
            default_filter: "seq_ingest=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus scrape address, e.g. `127.0.0.1:9898`. Only useful for long-lived callers.
    pub listen_addr: Option<String>,
    /// Pushgateway base URL, e.g. `http://localhost:9091`. Takes precedence over `listen_addr`.
    pub pushgateway_url: Option<String>,
    /// Pushgateway job label
    pub job: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: None,
            pushgateway_url: None,
            job: "seq_ingest".to_string(),
        }
    }
}

impl Config {
    /// Load from `$SEQ_INGEST_CONFIG` or `seq_ingest.toml`. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(Path::new(&path))?;
        if let Ok(addr) = std::env::var(METRICS_ADDR_ENV) {
            config.metrics.listen_addr = Some(addr);
        }
        if let Ok(url) = std::env::var(PUSHGATEWAY_URL_ENV) {
            config.metrics.pushgateway_url = Some(url);
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
        assert_eq!(config.logging.default_filter, "seq_ingest=info");
        assert!(config.metrics.listen_addr.is_none());
        assert!(config.metrics.pushgateway_url.is_none());
        assert_eq!(config.metrics.job, "seq_ingest");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [logging]
            directory = "/var/log/seq_ingest"

            [metrics]
            listen_addr = "127.0.0.1:9898"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/seq_ingest"));
        assert_eq!(config.logging.file_name, "seq_ingest.log");
        assert_eq!(config.metrics.listen_addr.as_deref(), Some("127.0.0.1:9898"));
    }

    #[test]
    fn test_pushgateway_section() {
        let config = Config::from_toml(
            r#"
            [metrics]
            pushgateway_url = "http://pushgateway.lab:9091"
            job = "nightly_ingest"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.metrics.pushgateway_url.as_deref(),
            Some("http://pushgateway.lab:9091")
        );
        assert_eq!(config.metrics.job, "nightly_ingest");
        assert!(config.metrics.listen_addr.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[logging\ndirectory ="),
            Err(IngestError::Toml(_))
        ));
    }
}
