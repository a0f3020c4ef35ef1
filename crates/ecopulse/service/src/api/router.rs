//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the query router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let router = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::engine_status))
        // History and simulation
        .route("/environmental_metrics", get(handlers::environmental_metrics))
        .route("/environmental_metrics/latest", get(handlers::latest_metrics))
        .route("/rolling_metrics", get(handlers::rolling_metrics))
        .route("/alerts", get(handlers::alerts))
        .route("/api/metrics", get(handlers::metrics_package))
        // Derived cross-sectional views
        .route("/district_comparison", get(handlers::district_comparison))
        .route("/national_metrics", get(handlers::national_metrics))
        .layer(TraceLayer::new_for_http());

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
