//! Prediction chain engine.
//!
//! Walks forward in time through model-derived next-event estimates,
//! applying the operating-hours adjustment at each step, until it finds the
//! next event strictly after "now" or determines none exists before closing.

use chrono::{Datelike, Duration, Timelike};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::api::OvenId;
use crate::models::time::Instant;
use crate::services::adjuster::PredictionAdjuster;
use crate::services::registry::{ModelError, OvenModelRegistry};

/// One model's raw output for one oven at one baseline instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvenPrediction {
    pub oven_id: OvenId,
    pub next_time: Option<Instant>,
    pub leftovers: f64,
}

/// The result of one chain advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainState {
    /// The instant the final chain step started from.
    pub baseline: Instant,
    /// The next predicted event after "now", or `None` when no further
    /// batches are expected today.
    pub earliest_next: Option<Instant>,
    /// Raw per-oven predictions from the final step. Only the chain minimum
    /// is adjusted against the calendar; individual oven times are carried
    /// as the models produced them.
    pub per_oven: Vec<OvenPrediction>,
}

/// Display status for one oven, derived against a caller-supplied "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OvenStatus {
    Active,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvenDetail {
    pub oven_id: OvenId,
    pub status: OvenStatus,
    /// Whole minutes until the predicted finish; absent when the oven has
    /// no future prediction.
    pub minutes_remaining: Option<i64>,
    pub leftovers: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Safety bound tripped: a defect signal, distinct from the valid
    /// "no more batches today" outcome.
    #[error("prediction chain exceeded {0} steps without resolving")]
    StepLimit(u32),
    #[error("model registry exposes no ovens")]
    NoOvens,
}

/// The chain-advance algorithm over a model registry and adjuster.
pub struct PredictionChainEngine {
    adjuster: PredictionAdjuster,
    registry: Arc<dyn OvenModelRegistry>,
    max_steps: u32,
}

impl PredictionChainEngine {
    pub fn new(
        adjuster: PredictionAdjuster,
        registry: Arc<dyn OvenModelRegistry>,
        max_steps: u32,
    ) -> Self {
        Self {
            adjuster,
            registry,
            max_steps,
        }
    }

    pub fn adjuster(&self) -> &PredictionAdjuster {
        &self.adjuster
    }

    pub fn oven_ids(&self) -> Vec<OvenId> {
        self.registry.oven_ids()
    }

    /// Query every oven's model at `at` and convert the raw minute offsets
    /// into instants. A non-finite or non-positive model output fails the
    /// whole query.
    fn query_all(&self, at: Instant) -> Result<Vec<OvenPrediction>, ChainError> {
        let mut per_oven = Vec::new();
        for oven in self.registry.oven_ids() {
            let forecast = self
                .registry
                .predict(oven, at.hour(), at.minute(), at.weekday())?;
            if !forecast.minutes_to_next.is_finite() || forecast.minutes_to_next <= 0.0 {
                return Err(ModelError::Malformed {
                    oven,
                    detail: format!("minutes_to_next = {}", forecast.minutes_to_next),
                }
                .into());
            }
            if !forecast.leftovers.is_finite() {
                return Err(ModelError::Malformed {
                    oven,
                    detail: format!("leftovers = {}", forecast.leftovers),
                }
                .into());
            }
            let offset = Duration::milliseconds((forecast.minutes_to_next * 60_000.0).round() as i64);
            let next_time = at.checked_add_signed(offset).ok_or_else(|| ModelError::Malformed {
                oven,
                detail: format!("minutes_to_next = {} overflows", forecast.minutes_to_next),
            })?;
            per_oven.push(OvenPrediction {
                oven_id: oven,
                next_time: Some(next_time),
                leftovers: forecast.leftovers,
            });
        }
        Ok(per_oven)
    }

    /// Advance the chain from `baseline` until the adjusted next event is
    /// `None` or strictly after `now`.
    pub fn advance(&self, baseline: Instant, now: Instant) -> Result<ChainState, ChainError> {
        let mut prediction_time = baseline;
        for _ in 0..self.max_steps {
            let per_oven = self.query_all(prediction_time)?;
            let earliest_raw = per_oven
                .iter()
                .filter_map(|p| p.next_time)
                .min()
                .ok_or(ChainError::NoOvens)?;

            match self.adjuster.adjust(earliest_raw, prediction_time) {
                None => {
                    return Ok(ChainState {
                        baseline: prediction_time,
                        earliest_next: None,
                        per_oven,
                    })
                }
                Some(adjusted) if adjusted > now => {
                    return Ok(ChainState {
                        baseline: prediction_time,
                        earliest_next: Some(adjusted),
                        per_oven,
                    })
                }
                // Event already happened; chain forward past it.
                Some(adjusted) => prediction_time = adjusted,
            }
        }
        Err(ChainError::StepLimit(self.max_steps))
    }
}

/// Derive display details for each oven against `now`.
pub fn oven_details(per_oven: &[OvenPrediction], now: Instant) -> Vec<OvenDetail> {
    per_oven
        .iter()
        .map(|p| match p.next_time {
            Some(t) if t > now => OvenDetail {
                oven_id: p.oven_id,
                status: OvenStatus::Active,
                minutes_remaining: Some((t - now).num_minutes()),
                leftovers: Some(p.leftovers),
            },
            _ => OvenDetail {
                oven_id: p.oven_id,
                status: OvenStatus::Idle,
                minutes_remaining: None,
                leftovers: Some(p.leftovers),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::{OperatingCalendar, WeeklyHours};
    use crate::models::time::StoreZone;
    use crate::services::registry::OvenForecast;
    use chrono::{NaiveDate, Weekday};

    /// Every oven always predicts the same constant offset.
    struct FixedStepRegistry {
        ovens: Vec<OvenId>,
        minutes: f64,
    }

    impl OvenModelRegistry for FixedStepRegistry {
        fn predict(
            &self,
            _oven: OvenId,
            _hour: u32,
            _minute: u32,
            _weekday: Weekday,
        ) -> Result<OvenForecast, ModelError> {
            Ok(OvenForecast {
                minutes_to_next: self.minutes,
                leftovers: 3.25,
            })
        }

        fn oven_ids(&self) -> Vec<OvenId> {
            self.ovens.clone()
        }
    }

    fn engine(minutes: f64, max_steps: u32) -> PredictionChainEngine {
        let calendar = OperatingCalendar::new(
            StoreZone::from_offset_hours(-5).unwrap(),
            WeeklyHours::standard(),
            Duration::minutes(20),
            Weekday::Sun,
        );
        let registry = Arc::new(FixedStepRegistry {
            ovens: vec![OvenId::new(1), OvenId::new(2)],
            minutes,
        });
        PredictionChainEngine::new(PredictionAdjuster::new(calendar), registry, max_steps)
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 7).unwrap()
    }

    #[test]
    fn test_single_step_when_prediction_is_future() {
        let eng = engine(90.0, 32);
        let zone = eng.adjuster().calendar().zone();
        let baseline = zone.at(monday(), 10, 0);
        let now = zone.at(monday(), 10, 5);
        let state = eng.advance(baseline, now).unwrap();
        assert_eq!(state.baseline, baseline);
        assert_eq!(state.earliest_next, Some(zone.at(monday(), 11, 30)));
        assert_eq!(state.per_oven.len(), 2);
    }

    #[test]
    fn test_chains_past_elapsed_events() {
        let eng = engine(90.0, 32);
        let zone = eng.adjuster().calendar().zone();
        let baseline = zone.at(monday(), 10, 0);
        // 11:30 and 13:00 already passed; first future event is 14:30.
        let now = zone.at(monday(), 13, 45);
        let state = eng.advance(baseline, now).unwrap();
        assert_eq!(state.baseline, zone.at(monday(), 13, 0));
        assert_eq!(state.earliest_next, Some(zone.at(monday(), 14, 30)));
    }

    #[test]
    fn test_intermediate_baselines_strictly_increase() {
        let eng = engine(45.0, 64);
        let zone = eng.adjuster().calendar().zone();
        let baseline = zone.at(monday(), 10, 0);
        let now = zone.at(monday(), 16, 0);
        let state = eng.advance(baseline, now).unwrap();
        // final baseline is the last elapsed event, strictly after the start
        assert!(state.baseline > baseline);
        assert!(state.earliest_next.unwrap() > now);
    }

    #[test]
    fn test_step_limit_is_a_distinct_error() {
        let eng = engine(10.0, 3);
        let zone = eng.adjuster().calendar().zone();
        let baseline = zone.at(monday(), 10, 0);
        let now = zone.at(monday(), 19, 0);
        assert!(matches!(
            eng.advance(baseline, now),
            Err(ChainError::StepLimit(3))
        ));
    }

    #[test]
    fn test_none_when_next_event_is_inside_buffer() {
        // At 19:30 baseline a 15-minute model lands on 19:45, inside the
        // Monday buffer (last call 19:40) with a same-day baseline.
        let eng = engine(15.0, 32);
        let zone = eng.adjuster().calendar().zone();
        let baseline = zone.at(monday(), 19, 30);
        let now = zone.at(monday(), 19, 30);
        let state = eng.advance(baseline, now).unwrap();
        assert_eq!(state.earliest_next, None);
    }

    #[test]
    fn test_malformed_model_output_fails_request() {
        let eng = engine(-5.0, 32);
        let zone = eng.adjuster().calendar().zone();
        let baseline = zone.at(monday(), 10, 0);
        let now = zone.at(monday(), 10, 5);
        assert!(matches!(
            eng.advance(baseline, now),
            Err(ChainError::Model(ModelError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_overflowing_model_output_fails_request() {
        // Finite but astronomically large: the offset must not panic on
        // addition, it must surface as a malformed-model error.
        let eng = engine(1e18, 32);
        let zone = eng.adjuster().calendar().zone();
        let baseline = zone.at(monday(), 10, 0);
        let now = zone.at(monday(), 10, 5);
        assert!(matches!(
            eng.advance(baseline, now),
            Err(ChainError::Model(ModelError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_oven_details_against_now() {
        let eng = engine(90.0, 32);
        let zone = eng.adjuster().calendar().zone();
        let baseline = zone.at(monday(), 10, 0);
        let now = zone.at(monday(), 10, 5);
        let state = eng.advance(baseline, now).unwrap();
        let details = oven_details(&state.per_oven, now);
        assert!(details.iter().all(|d| d.status == OvenStatus::Active));
        assert_eq!(details[0].minutes_remaining, Some(85));

        let later = zone.at(monday(), 12, 0);
        let details = oven_details(&state.per_oven, later);
        assert!(details.iter().all(|d| d.status == OvenStatus::Idle));
        assert!(details.iter().all(|d| d.minutes_remaining.is_none()));
    }
}
