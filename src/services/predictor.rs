//! Live prediction state and the transport-agnostic service API.
//!
//! One process-wide snapshot holds the last computed chain result. Every
//! read and write goes through a single mutex; chain computation itself runs
//! outside the lock and only the final swap is serialized, guarded by a
//! monotonic computed-at instant so an older computation can never overwrite
//! a newer manual correction that landed concurrently.

use chrono::Duration;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::api::OvenId;
use crate::models::calendar::OperatingCalendar;
use crate::models::time::Instant;
use crate::services::chain::{
    oven_details, ChainError, OvenDetail, OvenPrediction, OvenStatus, PredictionChainEngine,
};
use crate::services::events::BatchEvent;
use crate::services::hub::{ObserverHub, UpdateEvent};

/// Process-wide mutable prediction state. Initialized to "no prediction
/// yet"; overwritten wholesale on every successful chain computation.
#[derive(Debug, Clone, Default)]
pub struct LiveSnapshot {
    pub current_prediction: Option<Instant>,
    pub last_baseline: Option<Instant>,
    pub per_oven: Vec<OvenPrediction>,
    pub last_manual_update: Option<Instant>,
    pub computed_at: Option<Instant>,
}

/// Answer to a "current prediction" query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentPrediction {
    pub current_time: Instant,
    pub is_open: bool,
    pub earliest_time: Option<Instant>,
    pub is_rest_day: bool,
    pub last_manual_update: Option<Instant>,
    pub is_confirmed: bool,
}

/// Result of an accepted manual report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOutcome {
    pub status: String,
    pub new_prediction: Option<Instant>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("unknown oven {0}")]
    UnknownOven(OvenId),
    #[error("invalid report: {0}")]
    Invalid(String),
}

/// The serving core: chain engine + live snapshot + observer hub.
pub struct PredictionService {
    engine: PredictionChainEngine,
    live: Mutex<LiveSnapshot>,
    hub: ObserverHub,
    confirm_window: Duration,
    oven_ids: Vec<OvenId>,
}

impl PredictionService {
    pub fn new(engine: PredictionChainEngine, hub: ObserverHub, confirm_window: Duration) -> Self {
        let oven_ids = engine.oven_ids();
        Self {
            engine,
            live: Mutex::new(LiveSnapshot::default()),
            hub,
            confirm_window,
            oven_ids,
        }
    }

    pub fn calendar(&self) -> &OperatingCalendar {
        self.engine.adjuster().calendar()
    }

    pub fn oven_ids(&self) -> &[OvenId] {
        &self.oven_ids
    }

    /// Register an observer for update events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<UpdateEvent> {
        self.hub.subscribe()
    }

    /// Current prediction for `now`, refreshing the live snapshot if the
    /// cached result has been overtaken.
    pub fn current_prediction(&self, now: Instant) -> Result<CurrentPrediction, PredictionError> {
        let calendar = self.calendar();

        if !calendar.is_open(now) {
            // Closed: the calendar alone answers; models are not consulted.
            let next_open = calendar.next_open_time(now);
            let mut live = self.live.lock();
            if live.computed_at.map_or(true, |c| c <= now) {
                live.current_prediction = Some(next_open);
                live.computed_at = Some(now);
            }
            return Ok(self.render(&live, now, false));
        }

        let stale_baseline = {
            let live = self.live.lock();
            let needs_refresh = match live.current_prediction {
                // Cached result holds until "now" reaches it.
                Some(p) => now >= p,
                // A resolved "no more batches today" holds for its date.
                None => live
                    .computed_at
                    .map_or(true, |c| c.date_naive() != now.date_naive()),
            };
            if needs_refresh {
                Some(match (live.current_prediction, live.last_baseline) {
                    (Some(p), _) if p <= now => p,
                    (_, Some(b)) if b.date_naive() == now.date_naive() => b,
                    _ => now,
                })
            } else {
                None
            }
        };

        if let Some(baseline) = stale_baseline {
            debug!(%baseline, %now, "re-running prediction chain");
            // Model calls happen outside the lock.
            let chain = self.engine.advance(baseline, now)?;
            let mut live = self.live.lock();
            if live.computed_at.map_or(true, |c| c <= now) {
                live.current_prediction = chain.earliest_next;
                live.last_baseline = Some(chain.baseline);
                live.per_oven = chain.per_oven;
                live.computed_at = Some(now);
            }
        }

        let live = self.live.lock();
        Ok(self.render(&live, now, true))
    }

    /// Per-oven status snapshot; refreshes the live state first.
    pub fn oven_status(&self, now: Instant) -> Result<Vec<OvenDetail>, PredictionError> {
        self.current_prediction(now)?;
        let live = self.live.lock();
        if live.per_oven.is_empty() {
            // Nothing computed yet (e.g. queried while closed at startup).
            return Ok(self
                .oven_ids
                .iter()
                .map(|&oven_id| OvenDetail {
                    oven_id,
                    status: OvenStatus::Idle,
                    minutes_remaining: None,
                    leftovers: None,
                })
                .collect());
        }
        Ok(oven_details(&live.per_oven, now))
    }

    /// Accept a manually reported actual finish time.
    ///
    /// A future-dated report is a staff pre-announcement: it runs through
    /// the adjuster once, without chaining. A past report re-runs the full
    /// chain from the reported instant. Either branch overwrites the
    /// snapshot and fans out one update event. Idempotent for a fixed
    /// `(actual, now)` pair.
    pub fn report_actual(
        &self,
        actual: Instant,
        now: Instant,
    ) -> Result<ReportOutcome, PredictionError> {
        let actual = self.calendar().zone().normalize(actual);

        // The manual-update timestamp lives under the same last-writer-wins
        // guard as the prediction, so a straggling report can never pair a
        // newer prediction with an older timestamp.
        let (new_prediction, applied) = if actual > now {
            let adjusted = self.engine.adjuster().adjust(actual, now);
            let mut live = self.live.lock();
            let applied = live.computed_at.map_or(true, |c| c <= now);
            if applied {
                live.current_prediction = adjusted;
                live.computed_at = Some(now);
                live.last_manual_update = Some(now);
            }
            (adjusted, applied)
        } else {
            let chain = self.engine.advance(actual, now)?;
            let mut live = self.live.lock();
            let applied = live.computed_at.map_or(true, |c| c <= now);
            if applied {
                live.current_prediction = chain.earliest_next;
                live.last_baseline = Some(chain.baseline);
                live.per_oven = chain.per_oven;
                live.computed_at = Some(now);
                live.last_manual_update = Some(now);
            }
            (chain.earliest_next, applied)
        };

        info!(%actual, %now, ?new_prediction, applied, "manual report accepted");
        if applied {
            self.hub.notify(UpdateEvent::new(now));
        }

        Ok(ReportOutcome {
            status: "accepted".to_string(),
            new_prediction,
            message: match new_prediction {
                Some(t) => format!("Next batch expected at {}", t.format("%H:%M")),
                None => "No more batches expected today".to_string(),
            },
        })
    }

    /// Handle one staff batch event.
    pub fn handle_event(
        &self,
        event: BatchEvent,
        now: Instant,
    ) -> Result<ReportOutcome, PredictionError> {
        let oven = OvenId::new(event.oven());
        if !self.oven_ids.contains(&oven) {
            return Err(PredictionError::UnknownOven(oven));
        }

        match event {
            BatchEvent::StartCooking {
                expected_end_time, ..
            } => self.report_actual(expected_end_time, now),
            BatchEvent::AdjustCookingTime {
                new_expected_end_time,
                ..
            } => self.report_actual(new_expected_end_time, now),
            BatchEvent::FinishCooking { finished_at, .. } => self.report_actual(finished_at, now),
            BatchEvent::PostRush { chickens_left, .. } => {
                if !chickens_left.is_finite() || chickens_left < 0.0 {
                    return Err(PredictionError::Invalid(format!(
                        "chickens_left = {chickens_left}"
                    )));
                }
                let current = {
                    let mut live = self.live.lock();
                    match live.per_oven.iter_mut().find(|p| p.oven_id == oven) {
                        Some(p) => p.leftovers = chickens_left,
                        None => live.per_oven.push(OvenPrediction {
                            oven_id: oven,
                            next_time: None,
                            leftovers: chickens_left,
                        }),
                    }
                    if live.last_manual_update.map_or(true, |t| t <= now) {
                        live.last_manual_update = Some(now);
                    }
                    live.current_prediction
                };
                self.hub.notify(UpdateEvent::new(now));
                Ok(ReportOutcome {
                    status: "accepted".to_string(),
                    new_prediction: current,
                    message: format!("Recorded {chickens_left} leftovers for oven {oven}"),
                })
            }
        }
    }

    fn render(&self, live: &LiveSnapshot, now: Instant, is_open: bool) -> CurrentPrediction {
        CurrentPrediction {
            current_time: now,
            is_open,
            earliest_time: live.current_prediction,
            is_rest_day: self.calendar().is_rest_day(now.date_naive()),
            last_manual_update: live.last_manual_update,
            is_confirmed: live
                .last_manual_update
                .is_some_and(|t| now >= t && now - t < self.confirm_window),
        }
    }
}
