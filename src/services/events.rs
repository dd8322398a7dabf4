//! Staff-reported batch events.
//!
//! The floor dashboard reports a closed set of actions. Each kind carries
//! its own required fields and is decoded through serde's tagged-enum
//! support, so an unknown or malformed action is rejected at the boundary
//! instead of being string-matched downstream.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One staff-reported event, tagged by its `action` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BatchEvent {
    /// A batch went into the oven; staff pre-announce the expected finish.
    StartCooking {
        oven: u32,
        chickens: u32,
        expected_end_time: DateTime<FixedOffset>,
    },
    /// Staff corrected the expected finish of the running batch.
    AdjustCookingTime {
        oven: u32,
        new_expected_end_time: DateTime<FixedOffset>,
    },
    /// A batch just came out of the oven.
    FinishCooking {
        oven: u32,
        chickens: u32,
        finished_at: DateTime<FixedOffset>,
    },
    /// Leftover count recorded after the rush following a batch.
    PostRush {
        oven: u32,
        chickens_left: f64,
        recorded_at: DateTime<FixedOffset>,
    },
}

impl BatchEvent {
    pub fn oven(&self) -> u32 {
        match self {
            BatchEvent::StartCooking { oven, .. }
            | BatchEvent::AdjustCookingTime { oven, .. }
            | BatchEvent::FinishCooking { oven, .. }
            | BatchEvent::PostRush { oven, .. } => *oven,
        }
    }
}
