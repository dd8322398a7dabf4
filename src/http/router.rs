//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/prediction", get(handlers::get_prediction))
        .route("/ovens", get(handlers::get_oven_status))
        .route("/reports", post(handlers::post_report))
        .route("/events", post(handlers::post_event))
        .route("/schedule", get(handlers::get_schedule))
        .route("/updates", get(handlers::stream_updates));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::{OperatingCalendar, WeeklyHours};
    use crate::models::time::StoreZone;
    use crate::services::{
        FinishTableRegistry, ObserverHub, PredictionAdjuster, PredictionChainEngine,
        PredictionService,
    };
    use chrono::{Duration, Weekday};
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let calendar = OperatingCalendar::new(
            StoreZone::from_offset_hours(-5).unwrap(),
            WeeklyHours::standard(),
            Duration::minutes(20),
            Weekday::Sun,
        );
        let engine = PredictionChainEngine::new(
            PredictionAdjuster::new(calendar),
            Arc::new(FinishTableRegistry::with_defaults(4)),
            64,
        );
        let service = Arc::new(PredictionService::new(
            engine,
            ObserverHub::default(),
            Duration::minutes(90),
        ));
        let _router = create_router(AppState::new(service));
    }
}
