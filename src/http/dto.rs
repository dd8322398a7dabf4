//! Data Transfer Objects for the HTTP API.
//!
//! Service-layer types that already derive Serialize (`CurrentPrediction`,
//! `ReportOutcome`, `UpdateEvent`) are returned as-is; this module adds the
//! request bodies and the display-shaped oven status response.

use serde::{Deserialize, Serialize};

// Re-export service DTOs that go over the wire unchanged.
pub use crate::api::{BatchEvent, CurrentPrediction, ReportOutcome, UpdateEvent, WeeklyHours};
use crate::services::chain::{OvenDetail, OvenStatus};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Request body for reporting an actual batch finish time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// RFC 3339 timestamp of the reported finish.
    pub actual_time: String,
}

/// One oven's display status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvenDetailDto {
    pub oven: u32,
    pub status: OvenStatus,
    /// e.g. "85 min", or "unknown" when the oven has no future prediction.
    pub time_remaining: String,
    /// Expected leftovers, rounded to two decimals; "unknown" maps to null.
    pub leftovers: Option<f64>,
}

impl From<OvenDetail> for OvenDetailDto {
    fn from(detail: OvenDetail) -> Self {
        Self {
            oven: detail.oven_id.value(),
            status: detail.status,
            time_remaining: match detail.minutes_remaining {
                Some(minutes) => format!("{minutes} min"),
                None => "unknown".to_string(),
            },
            leftovers: detail.leftovers.map(|v| (v * 100.0).round() / 100.0),
        }
    }
}

/// Response for the oven status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvenStatusResponse {
    pub ovens: Vec<OvenDetailDto>,
    pub total: usize,
}

/// Weekly schedule echo: the configured table, returned verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub weekly_hours: WeeklyHours,
    pub rest_day: String,
}
