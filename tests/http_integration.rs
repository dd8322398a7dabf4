//! Router-level smoke tests for the HTTP API.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, Weekday};
use std::sync::Arc;
use tower::ServiceExt;

use ovenwatch::http::{create_router, AppState};
use ovenwatch::models::calendar::{OperatingCalendar, WeeklyHours};
use ovenwatch::models::time::StoreZone;
use ovenwatch::services::{
    FinishTableRegistry, ObserverHub, PredictionAdjuster, PredictionChainEngine, PredictionService,
};

fn router() -> axum::Router {
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
    create_router(AppState::new(service))
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_prediction() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/v1/prediction")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_schedule() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/v1/schedule")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_report_with_unparsable_time_is_rejected() {
    let response = router()
        .oneshot(json_post("/v1/reports", r#"{"actual_time": "ten thirty"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_future_dated_report_is_accepted() {
    let response = router()
        .oneshot(json_post(
            "/v1/reports",
            r#"{"actual_time": "2099-07-06T12:00:00-05:00"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_event_for_unknown_oven_is_not_found() {
    let response = router()
        .oneshot(json_post(
            "/v1/events",
            r#"{
                "action": "post_rush",
                "oven": 99,
                "chickens_left": 2.0,
                "recorded_at": "2099-07-06T12:00:00-05:00"
            }"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_with_unknown_action_is_rejected() {
    let response = router()
        .oneshot(json_post("/v1/events", r#"{"action": "set_on_fire", "oven": 1}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
