//! Configuration for the EcoPulse engine

use ecopulse_history::DEFAULT_CAPACITY;
use ecopulse_ingestion::{IngestionConfig, SourceConfig};
use ecopulse_types::ThresholdTable;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Event source the worker subscribes to
    #[serde(default)]
    pub source: SourceConfig,

    /// Ingestion worker behaviour
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// History retention
    #[serde(default)]
    pub history: HistoryConfig,

    /// Query limits
    #[serde(default)]
    pub query: QueryConfig,

    /// Alert and severity limits
    #[serde(default)]
    pub thresholds: ThresholdTable,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            source: SourceConfig::default(),
            ingestion: IngestionConfig::default(),
            history: HistoryConfig::default(),
            query: QueryConfig::default(),
            thresholds: ThresholdTable::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Records retained; the oldest is evicted beyond this
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Most records a history query returns
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Records averaged by the rolling summary and anomaly window
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    /// Records the forecast line is fitted on
    #[serde(default = "default_forecast_window")]
    pub forecast_window: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            rolling_window: default_rolling_window(),
            forecast_window: default_forecast_window(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8080))
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_max_history() -> usize {
    50
}

fn default_rolling_window() -> usize {
    30
}

fn default_forecast_window() -> usize {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `ECOPULSE_*` environment variables (`__` separates sections).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&EngineConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        // Add environment variables with ECOPULSE_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("ECOPULSE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert!(config.server.enable_cors);
        assert_eq!(config.history.capacity, 100);
        assert_eq!(config.query.max_history, 50);
        assert_eq!(config.ingestion.poll_timeout_ms, 1_000);
        assert!(config.ingestion.reconnect.is_none());
        assert!(matches!(config.source, SourceConfig::Redis { .. }));
        assert_eq!(config.thresholds.aqi.warning, 100.0);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let config = EngineConfig::load(None).unwrap();
        assert_eq!(config.query.rolling_window, 30);
        assert_eq!(config.query.forecast_window, 20);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[source]
type = "file"
path = "/var/lib/ecopulse/stream.jsonl"
from_start = true

[history]
capacity = 10

[ingestion.reconnect]
max_attempts = 3

[thresholds.aqi]
warning = 80.0
critical = 150.0
emergency = 250.0
"#
        )
        .unwrap();
        file.flush().unwrap();

        let path = file.path().to_str().unwrap();
        let config = EngineConfig::load(Some(path)).unwrap();

        assert_eq!(config.history.capacity, 10);
        assert!(matches!(
            config.source,
            SourceConfig::File { from_start: true, .. }
        ));
        assert_eq!(config.ingestion.reconnect.map(|p| p.max_attempts), Some(3));
        assert_eq!(config.thresholds.aqi.emergency, 250.0);
        assert_eq!(config.thresholds.pm25.warning, 35.0);
        assert_eq!(config.server.listen_addr.port(), 8080);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(EngineConfig::load(path.to_str()).is_err());
    }
}
