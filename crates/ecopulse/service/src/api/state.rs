//! Application state for API handlers

use crate::config::QueryConfig;
use ecopulse_history::HistoryReader;
use ecopulse_ingestion::WorkerHandle;
use ecopulse_types::ThresholdTable;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Read side of the history store
    pub history: HistoryReader,

    /// Configured history capacity
    pub capacity: usize,

    /// Ingestion worker state and counters
    pub worker: WorkerHandle,

    /// Thresholds applied to simulations and alerts
    pub thresholds: ThresholdTable,

    /// Query limits
    pub query: QueryConfig,

    /// Service version
    pub version: String,

    /// Service start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        history: HistoryReader,
        capacity: usize,
        worker: WorkerHandle,
        thresholds: ThresholdTable,
        query: QueryConfig,
    ) -> Self {
        Self {
            history,
            capacity,
            worker,
            thresholds,
            query,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
