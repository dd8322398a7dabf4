//! Oven model registry.
//!
//! The core treats each oven's model pair (time-to-next-batch, expected
//! leftovers) as an opaque deterministic estimator behind the
//! [`OvenModelRegistry`] trait. Loaded model artifacts plug in behind the
//! same trait; [`FinishTableRegistry`] is the shipped table-driven
//! implementation used for serving and tests.

use chrono::Weekday;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::api::OvenId;

/// One model invocation's raw output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvenForecast {
    /// Minutes until the oven's next batch finishes, relative to the query
    /// instant. Must be finite and strictly positive.
    pub minutes_to_next: f64,
    /// Expected leftovers from the batch, carried unrounded.
    pub leftovers: f64,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no model registered for oven {0}")]
    UnknownOven(OvenId),
    #[error("model for oven {oven} returned a malformed prediction: {detail}")]
    Malformed { oven: OvenId, detail: String },
}

/// Mapping from oven identifier to a deterministic estimator pair.
///
/// Implementations must be idempotent oracles: fixed inputs, fixed outputs.
/// The engine never retries or caches a call beyond one invocation per
/// chain step.
pub trait OvenModelRegistry: Send + Sync {
    fn predict(
        &self,
        oven: OvenId,
        hour: u32,
        minute: u32,
        weekday: Weekday,
    ) -> Result<OvenForecast, ModelError>;

    /// The ovens this registry carries models for.
    fn oven_ids(&self) -> Vec<OvenId>;
}

/// Registry backed by a per-oven, per-weekday table of typical finish times
/// (clock hours), derived from historical batch logs.
#[derive(Debug, Clone)]
pub struct FinishTableRegistry {
    /// Sorted finish clock-hours, indexed by weekday (Monday = 0).
    finish_hours: BTreeMap<OvenId, [Vec<u32>; 7]>,
    /// Typical leftovers per oven.
    leftovers: BTreeMap<OvenId, f64>,
}

impl FinishTableRegistry {
    pub fn new(finish_hours: BTreeMap<OvenId, [Vec<u32>; 7]>, leftovers: BTreeMap<OvenId, f64>) -> Self {
        Self {
            finish_hours,
            leftovers,
        }
    }

    /// Default table for `oven_count` ovens: staggered first finishes one
    /// hour apart from 11:00, then every two hours until shortly before
    /// close (17:00 cutoff on Sunday, 19:00 otherwise).
    pub fn with_defaults(oven_count: u32) -> Self {
        let mut finish_hours = BTreeMap::new();
        let mut leftovers = BTreeMap::new();
        for n in 1..=oven_count {
            let oven = OvenId::new(n);
            let first = 10 + n;
            let mut week: [Vec<u32>; 7] = Default::default();
            for (day, slot) in week.iter_mut().enumerate() {
                let last = if day == 6 { 17 } else { 19 };
                let mut h = first;
                while h <= last {
                    slot.push(h);
                    h += 2;
                }
            }
            finish_hours.insert(oven, week);
            leftovers.insert(oven, 2.0 + 0.75 * f64::from(n));
        }
        Self::new(finish_hours, leftovers)
    }

    fn day_slot(&self, oven: OvenId, weekday: Weekday) -> Result<&Vec<u32>, ModelError> {
        self.finish_hours
            .get(&oven)
            .map(|week| &week[weekday.num_days_from_monday() as usize])
            .ok_or(ModelError::UnknownOven(oven))
    }
}

impl OvenModelRegistry for FinishTableRegistry {
    fn predict(
        &self,
        oven: OvenId,
        hour: u32,
        minute: u32,
        weekday: Weekday,
    ) -> Result<OvenForecast, ModelError> {
        let leftovers = *self
            .leftovers
            .get(&oven)
            .ok_or(ModelError::UnknownOven(oven))?;
        let now_min = hour * 60 + minute;

        // Next finish strictly after the query instant, today first.
        let today = self.day_slot(oven, weekday)?;
        if let Some(&finish) = today.iter().find(|&&h| h * 60 > now_min) {
            return Ok(OvenForecast {
                minutes_to_next: f64::from(finish * 60 - now_min),
                leftovers,
            });
        }

        // Otherwise wrap to the first finish of a following day.
        let mut wd = weekday.succ();
        for days_ahead in 1..=7u32 {
            if let Some(&finish) = self.day_slot(oven, wd)?.first() {
                let minutes = days_ahead * 1440 + finish * 60 - now_min;
                return Ok(OvenForecast {
                    minutes_to_next: f64::from(minutes),
                    leftovers,
                });
            }
            wd = wd.succ();
        }

        Err(ModelError::Malformed {
            oven,
            detail: "finish-time table is empty".to_string(),
        })
    }

    fn oven_ids(&self) -> Vec<OvenId> {
        self.finish_hours.keys().copied().collect()
    }
}
