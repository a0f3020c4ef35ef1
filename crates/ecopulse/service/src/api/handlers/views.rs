//! Derived cross-sectional view handlers

use crate::api::state::AppState;
use crate::views::{district_view, national_view};
use axum::{extract::State, Json};
use ecopulse_types::{DistrictView, NationalView};

/// District comparison; empty until a reading has been stored
pub async fn district_comparison(State(state): State<AppState>) -> Json<Vec<DistrictView>> {
    let rows = state
        .history
        .latest()
        .map(|latest| district_view(latest.aqi()))
        .unwrap_or_default();
    Json(rows)
}

/// Regional comparison; empty until a reading has been stored
pub async fn national_metrics(State(state): State<AppState>) -> Json<Vec<NationalView>> {
    let rows = state
        .history
        .latest()
        .map(|latest| national_view(latest.aqi()))
        .unwrap_or_default();
    Json(rows)
}
