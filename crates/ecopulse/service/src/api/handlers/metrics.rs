//! History, simulation and analytics handlers

use crate::api::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use ecopulse_analytics::{
    alert_status, anomaly_flags, forecast_next, rolling_summary, simulate, EnrichmentContext,
};
use ecopulse_types::{Alert, AnomalyFlags, EnrichedRecord, RollingSummary, WhatIfParams};
use serde::{Deserialize, Serialize};

/// Query string for history and what-if requests. Values arrive as raw
/// strings so bad numbers surface as a JSON 400; blank values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    pub limit: Option<String>,
    pub traffic_reduction: Option<String>,
    pub industrial_restriction: Option<String>,
    pub green_cover: Option<String>,
}

impl MetricsQuery {
    /// The what-if parameters, if any were given.
    fn whatif(&self) -> ApiResult<Option<WhatIfParams>> {
        if given(&self.traffic_reduction).is_none()
            && given(&self.industrial_restriction).is_none()
            && given(&self.green_cover).is_none()
        {
            return Ok(None);
        }

        Ok(Some(WhatIfParams {
            traffic_reduction: parse_percent("traffic_reduction", &self.traffic_reduction)?,
            industrial_restriction: parse_percent(
                "industrial_restriction",
                &self.industrial_restriction,
            )?,
            green_cover: parse_percent("green_cover", &self.green_cover)?,
        }))
    }

    fn limit(&self, max: usize) -> ApiResult<usize> {
        match given(&self.limit) {
            None => Ok(max),
            Some(raw) => raw
                .parse::<usize>()
                .map(|limit| limit.min(max))
                .map_err(|_| {
                    ApiError::BadRequest(format!(
                        "limit must be a non-negative integer, got {raw:?}"
                    ))
                }),
        }
    }
}

fn given(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn parse_percent(name: &str, raw: &Option<String>) -> ApiResult<f64> {
    let Some(raw) = given(raw) else {
        return Ok(0.0);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ApiError::BadRequest(format!(
            "{name} must be a number, got {raw:?}"
        ))),
    }
}

/// Stored history, or a single simulated record when what-if parameters are
/// present and there is something to simulate from
pub async fn environmental_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> ApiResult<Json<Vec<EnrichedRecord>>> {
    let whatif = query.whatif()?;
    let limit = query.limit(state.query.max_history)?;
    let snapshot = state.history.snapshot();

    if let (Some(params), Some(latest)) = (whatif, snapshot.latest()) {
        let prior = snapshot.recent_aqi(snapshot.len());
        let context = EnrichmentContext::new(&prior, &state.thresholds);
        let simulated = simulate(latest, &params, &context);

        tracing::debug!(
            base_aqi = latest.aqi(),
            simulated_aqi = simulated.aqi(),
            "what-if simulation served"
        );
        return Ok(Json(vec![simulated]));
    }

    Ok(Json(snapshot.tail(limit)))
}

/// Most recent stored record
pub async fn latest_metrics(State(state): State<AppState>) -> ApiResult<Json<EnrichedRecord>> {
    state
        .history
        .latest()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no readings ingested yet".to_string()))
}

/// Averages over the rolling window
pub async fn rolling_metrics(State(state): State<AppState>) -> Json<Vec<RollingSummary>> {
    let recent = state.history.snapshot().tail(state.query.rolling_window);
    Json(rolling_summary(&recent).into_iter().collect())
}

/// Threshold alerts raised by the latest record
pub async fn alerts(State(state): State<AppState>) -> Json<Vec<Alert>> {
    let alerts = state
        .history
        .latest()
        .map(|latest| alert_status(&latest, &state.thresholds))
        .unwrap_or_default();
    Json(alerts)
}

/// Everything a dashboard needs in one response
#[derive(Debug, Serialize)]
pub struct MetricsPackage {
    pub latest: Option<EnrichedRecord>,
    pub alerts: Vec<Alert>,
    pub forecast: Option<f64>,
    pub anomaly: Option<AnomalyFlags>,
    pub history: Vec<EnrichedRecord>,
}

pub async fn metrics_package(State(state): State<AppState>) -> Json<MetricsPackage> {
    let snapshot = state.history.snapshot();
    let latest = snapshot.latest().cloned();

    let alerts = latest
        .as_ref()
        .map(|record| alert_status(record, &state.thresholds))
        .unwrap_or_default();
    let forecast = forecast_next(&snapshot.recent_aqi(state.query.forecast_window));
    let window = snapshot.recent_aqi(state.query.rolling_window + 1);
    let anomaly = window
        .split_last()
        .map(|(current, prior)| anomaly_flags(*current, prior));

    Json(MetricsPackage {
        latest,
        alerts,
        forecast,
        anomaly,
        history: snapshot.tail(state.query.max_history),
    })
}
