//! HTTP handlers for the REST API.
//!
//! Each handler stamps the request with the store-zone wall clock and
//! delegates to the service layer for business logic.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use super::dto::{
    BatchEvent, CurrentPrediction, HealthResponse, OvenDetailDto, OvenStatusResponse,
    ReportOutcome, ReportRequest, ScheduleResponse,
};
use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
    })
}

/// GET /v1/prediction
///
/// Current prediction for the store-zone wall clock, refreshing the live
/// snapshot if the cached result has been overtaken.
pub async fn get_prediction(State(state): State<AppState>) -> HandlerResult<CurrentPrediction> {
    let now = state.zone.now();
    let prediction = state.service.current_prediction(now)?;
    Ok(Json(prediction))
}

/// GET /v1/ovens
///
/// Per-oven status snapshot. Refreshes the live state as a side effect
/// before reading.
pub async fn get_oven_status(State(state): State<AppState>) -> HandlerResult<OvenStatusResponse> {
    let now = state.zone.now();
    let details = state.service.oven_status(now)?;
    let ovens: Vec<OvenDetailDto> = details.into_iter().map(Into::into).collect();
    let total = ovens.len();
    Ok(Json(OvenStatusResponse { ovens, total }))
}

/// POST /v1/reports
///
/// Accept a manually reported actual finish time. The timestamp is
/// validated before any state mutation.
pub async fn post_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> HandlerResult<ReportOutcome> {
    let actual = state
        .zone
        .parse(&request.actual_time)
        .map_err(|e| AppError::BadRequest(format!("invalid actual_time: {e}")))?;
    let now = state.zone.now();
    let outcome = state.service.report_actual(actual, now)?;
    Ok(Json(outcome))
}

/// POST /v1/events
///
/// Accept one staff batch event (tagged by its `action` field).
pub async fn post_event(
    State(state): State<AppState>,
    Json(event): Json<BatchEvent>,
) -> HandlerResult<ReportOutcome> {
    let now = state.zone.now();
    let outcome = state.service.handle_event(event, now)?;
    Ok(Json(outcome))
}

/// GET /v1/schedule
///
/// The configured weekly operating-hours table, echoed verbatim.
pub async fn get_schedule(State(state): State<AppState>) -> Json<ScheduleResponse> {
    let calendar = state.service.calendar();
    Json(ScheduleResponse {
        weekly_hours: calendar.hours().clone(),
        rest_day: calendar.rest_day().to_string(),
    })
}

/// GET /v1/updates
///
/// Live update stream via Server-Sent Events, one event per accepted
/// manual report. A subscriber that lags behind the broadcast buffer is
/// treated as disconnected and its stream ends.
pub async fn stream_updates(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.service.subscribe();
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(update) => {
                    let data = serde_json::to_string(&update).unwrap_or_default();
                    yield Ok(Event::default().event("update").data(data));
                }
                // Fell behind the bounded buffer: drop the observer.
                Err(RecvError::Lagged(_)) => break,
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
