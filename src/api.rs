//! Public API surface for the oven prediction backend.
//!
//! This file consolidates the identifier and DTO types shared between the
//! service layer and the HTTP API. All types derive Serialize/Deserialize
//! for JSON serialization.

pub use crate::models::calendar::{DayHours, OperatingWindow, WeeklyHours};
pub use crate::services::chain::{ChainState, OvenDetail, OvenPrediction, OvenStatus};
pub use crate::services::events::BatchEvent;
pub use crate::services::hub::UpdateEvent;
pub use crate::services::predictor::{CurrentPrediction, ReportOutcome};
pub use crate::services::registry::OvenForecast;

use serde::{Deserialize, Serialize};

/// Oven identifier (1-based, matching the numbering staff use on the floor).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OvenId(pub u32);

impl OvenId {
    pub fn new(value: u32) -> Self {
        OvenId(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for OvenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<OvenId> for u32 {
    fn from(id: OvenId) -> Self {
        id.0
    }
}

impl From<u32> for OvenId {
    fn from(value: u32) -> Self {
        OvenId(value)
    }
}
