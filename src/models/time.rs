use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

/// A point in time, always expressed in the store's operating zone.
///
/// Every instant that crosses a module boundary in this crate carries the
/// store offset; naive datetimes never escape this module.
pub type Instant = DateTime<FixedOffset>;

/// The store's fixed local time zone, as a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreZone(FixedOffset);

impl StoreZone {
    /// Create a zone from a whole-hour UTC offset (e.g. -5 for US Eastern
    /// standard time). Returns `None` for offsets outside +/-23 hours.
    pub fn from_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(StoreZone)
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    /// Current wall-clock time in the store zone.
    pub fn now(&self) -> Instant {
        Utc::now().with_timezone(&self.0)
    }

    /// Build an instant from a local calendar date and clock time.
    pub fn at(&self, date: NaiveDate, hour: u32, minute: u32) -> Instant {
        let naive = date
            .and_hms_opt(hour, minute, 0)
            .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
        naive
            .and_local_timezone(self.0)
            .single()
            .unwrap_or_else(|| DateTime::UNIX_EPOCH.with_timezone(&self.0))
    }

    /// Parse an RFC 3339 timestamp and normalize it into the store zone.
    pub fn parse(&self, s: &str) -> Result<Instant, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|t| t.with_timezone(&self.0))
    }

    /// Re-anchor an instant from any offset into the store zone.
    pub fn normalize(&self, t: Instant) -> Instant {
        t.with_timezone(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreZone;
    use chrono::{NaiveDate, Timelike};

    fn eastern() -> StoreZone {
        StoreZone::from_offset_hours(-5).unwrap()
    }

    #[test]
    fn test_zone_from_offset() {
        assert!(StoreZone::from_offset_hours(-5).is_some());
        assert!(StoreZone::from_offset_hours(0).is_some());
        assert!(StoreZone::from_offset_hours(24).is_none());
    }

    #[test]
    fn test_at_builds_local_instant() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 7).unwrap();
        let t = eastern().at(date, 10, 30);
        assert_eq!(t.hour(), 10);
        assert_eq!(t.minute(), 30);
        assert_eq!(t.date_naive(), date);
    }

    #[test]
    fn test_parse_normalizes_offset() {
        let zone = eastern();
        // 15:00 UTC == 10:00 eastern standard
        let t = zone.parse("2024-10-07T15:00:00+00:00").unwrap();
        assert_eq!(t.hour(), 10);
        assert_eq!(t.offset(), &zone.offset());
    }

    #[test]
    fn test_parse_rejects_naive_input() {
        assert!(eastern().parse("2024-10-07 10:00").is_err());
        assert!(eastern().parse("10:00 AM").is_err());
    }

    #[test]
    fn test_instants_compare_across_offsets() {
        let zone = eastern();
        let a = zone.parse("2024-10-07T15:00:00+00:00").unwrap();
        let b = zone.parse("2024-10-07T10:00:00-05:00").unwrap();
        assert_eq!(a, b);
    }
}
