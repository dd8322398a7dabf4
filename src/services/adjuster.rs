//! Business-rule corrections applied to raw model predictions.

use crate::models::calendar::OperatingCalendar;
use crate::models::time::Instant;

/// Clamps raw predictions against the operating calendar.
///
/// The precedence of the rules is load-bearing: a prediction physically
/// outside operating hours always wins over one merely inside the last-call
/// buffer, and the cutoff comparison is a strict `>` so that a prediction
/// exactly at last call still goes through unchanged.
#[derive(Debug, Clone)]
pub struct PredictionAdjuster {
    calendar: OperatingCalendar,
}

impl PredictionAdjuster {
    pub fn new(calendar: OperatingCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &OperatingCalendar {
        &self.calendar
    }

    /// Adjust a raw model prediction against the store calendar.
    ///
    /// Returns `None` for "no further batches today"; otherwise the instant
    /// the prediction is carried to:
    ///
    /// 1. Outside operating hours -> the next calendar day's opening.
    /// 2. After last call (strictly), baseline on the same date: rest day
    ///    keeps the prediction, any other day yields `None`. Baseline on a
    ///    prior date carries the prediction to its own date's opening.
    /// 3. Otherwise the prediction passes through unchanged.
    pub fn adjust(&self, raw: Instant, baseline: Instant) -> Option<Instant> {
        let date = raw.date_naive();

        if !self.calendar.is_open(raw) {
            // Already past closing (or before opening); the next batch can
            // only land at the following day's opening.
            let next_day = date.succ_opt().unwrap_or(date);
            return Some(self.calendar.opening_time(next_day));
        }

        if raw > self.calendar.last_call_time(date) {
            if baseline.date_naive() == date {
                if self.calendar.is_rest_day(date) {
                    // Rest-day policy allows batches inside the buffer.
                    return Some(raw);
                }
                return None;
            }
            // Baseline from a prior date: carry to this date's opening.
            return Some(self.calendar.opening_time(date));
        }

        Some(raw)
    }
}
