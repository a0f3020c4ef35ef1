//! Health and status handlers

use crate::api::state::AppState;
use axum::{extract::State, Json};
use ecopulse_ingestion::{IngestionCounters, WorkerState};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        service: "ecopulse".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

/// Engine status response
#[derive(Debug, Serialize)]
pub struct EngineStatusResponse {
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub source: String,
    pub worker: WorkerState,
    pub ingestion: IngestionCounters,
    pub history: HistoryStatus,
}

#[derive(Debug, Serialize)]
pub struct HistoryStatus {
    pub len: usize,
    pub capacity: usize,
    pub total_appended: u64,
    pub latest_timestamp: Option<String>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Engine status endpoint
pub async fn engine_status(State(state): State<AppState>) -> Json<EngineStatusResponse> {
    let snapshot = state.history.snapshot();

    Json(EngineStatusResponse {
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        source: state.worker.source().to_string(),
        worker: state.worker.state(),
        ingestion: state.worker.counters(),
        history: HistoryStatus {
            len: snapshot.len(),
            capacity: state.capacity,
            total_appended: snapshot.total_appended(),
            latest_timestamp: snapshot.latest().map(|r| r.timestamp().to_string()),
            published_at: snapshot.published_at(),
        },
    })
}
