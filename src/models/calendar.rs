//! Store operating hours.
//!
//! Pure weekday-keyed computation of opening, closing, and last-call times.
//! No shared state; safe to call from any thread.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::time::{Instant, StoreZone};

/// Opening and closing clock times for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open_hour: u32,
    pub open_minute: u32,
    pub close_hour: u32,
    pub close_minute: u32,
}

impl DayHours {
    pub fn new(open_hour: u32, open_minute: u32, close_hour: u32, close_minute: u32) -> Self {
        Self {
            open_hour,
            open_minute,
            close_hour,
            close_minute,
        }
    }
}

/// Weekly operating-hours table, indexed by weekday (Monday = 0).
///
/// The table is read-only configuration: it is consumed verbatim and echoed
/// unmodified to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    days: [DayHours; 7],
}

impl WeeklyHours {
    pub fn new(days: [DayHours; 7]) -> Self {
        Self { days }
    }

    /// The store's standard week: Mon-Fri 10:00-20:00, Sat 09:00-20:00,
    /// Sun 10:00-18:00.
    pub fn standard() -> Self {
        Self::new([
            DayHours::new(10, 0, 20, 0), // Monday
            DayHours::new(10, 0, 20, 0), // Tuesday
            DayHours::new(10, 0, 20, 0), // Wednesday
            DayHours::new(10, 0, 20, 0), // Thursday
            DayHours::new(10, 0, 20, 0), // Friday
            DayHours::new(9, 0, 20, 0),  // Saturday
            DayHours::new(10, 0, 18, 0), // Sunday
        ])
    }

    pub fn for_weekday(&self, weekday: Weekday) -> DayHours {
        self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn days(&self) -> &[DayHours; 7] {
        &self.days
    }
}

/// Opening, closing, and last-call instants for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingWindow {
    pub open: Instant,
    pub close: Instant,
    pub last_call: Instant,
}

/// Calendar answering "when does the store open/close" and "is this instant
/// within operating hours" for the configured store zone.
#[derive(Debug, Clone)]
pub struct OperatingCalendar {
    zone: StoreZone,
    hours: WeeklyHours,
    last_call_buffer: Duration,
    rest_day: Weekday,
}

impl OperatingCalendar {
    pub fn new(
        zone: StoreZone,
        hours: WeeklyHours,
        last_call_buffer: Duration,
        rest_day: Weekday,
    ) -> Self {
        Self {
            zone,
            hours,
            last_call_buffer,
            rest_day,
        }
    }

    pub fn zone(&self) -> StoreZone {
        self.zone
    }

    pub fn hours(&self) -> &WeeklyHours {
        &self.hours
    }

    pub fn opening_time(&self, date: NaiveDate) -> Instant {
        let day = self.hours.for_weekday(date.weekday());
        self.zone.at(date, day.open_hour, day.open_minute)
    }

    pub fn closing_time(&self, date: NaiveDate) -> Instant {
        let day = self.hours.for_weekday(date.weekday());
        self.zone.at(date, day.close_hour, day.close_minute)
    }

    /// Latest instant a new batch is assumed to start: closing minus the
    /// configured buffer. The rest-day relaxation of this rule lives in the
    /// adjuster, not here.
    pub fn last_call_time(&self, date: NaiveDate) -> Instant {
        self.closing_time(date) - self.last_call_buffer
    }

    pub fn window(&self, date: NaiveDate) -> OperatingWindow {
        OperatingWindow {
            open: self.opening_time(date),
            close: self.closing_time(date),
            last_call: self.last_call_time(date),
        }
    }

    /// `open <= t < close` for t's own calendar date.
    pub fn is_open(&self, t: Instant) -> bool {
        let date = t.date_naive();
        self.opening_time(date) <= t && t < self.closing_time(date)
    }

    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        date.weekday() == self.rest_day
    }

    pub fn rest_day(&self) -> Weekday {
        self.rest_day
    }

    /// Next opening at or after `now`: today's opening if `now` has not
    /// reached it yet, otherwise the following day's opening.
    pub fn next_open_time(&self, now: Instant) -> Instant {
        let today = now.date_naive();
        let todays_open = self.opening_time(today);
        if now < todays_open {
            todays_open
        } else {
            self.opening_time(today.succ_opt().unwrap_or(today))
        }
    }
}
