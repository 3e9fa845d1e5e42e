//! Day-boundary policy.
//!
//! Donation eligibility, streaks and gaps are all defined in terms of
//! calendar days, and which instant belongs to which day depends on a
//! single process-wide offset. The offset is injected configuration
//! rather than a hard-coded constant so midnight-boundary behavior is
//! testable; the default of +9h approximates the original service's
//! regional day boundary.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// Default day-boundary offset, in hours east of UTC.
pub const DEFAULT_OFFSET_HOURS: i32 = 9;

/// Maps instants to calendar days using a fixed UTC offset.
///
/// Every day key the engine or the store derives must come from the same
/// `DayBoundary` so the donation policy, the streak calculator and the
/// persisted `day_key` column agree on where days start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    /// Create a boundary at the given whole-hour offset east of UTC.
    ///
    /// Out-of-range offsets (beyond +/-23h) fall back to the default.
    pub fn from_offset_hours(hours: i32) -> Self {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| FixedOffset::east_opt(DEFAULT_OFFSET_HOURS * 3600).unwrap());
        Self { offset }
    }

    /// The calendar day the given instant falls on.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// The current calendar day.
    pub fn today(&self) -> NaiveDate {
        self.day_of(Utc::now())
    }

    /// Whole-day difference `later - earlier`.
    ///
    /// Integer day-count subtraction on date-only values; time of day has
    /// already been discarded, so there is no partial-day rounding.
    pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
        (later - earlier).num_days()
    }

    /// Whether `day` is `reference` or the day before it.
    pub fn is_today_or_yesterday(day: NaiveDate, reference: NaiveDate) -> bool {
        day == reference || day + Duration::days(1) == reference
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::from_offset_hours(DEFAULT_OFFSET_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn offset_shifts_day_across_midnight() {
        // 16:00 UTC on Jan 1 is already Jan 2 at +9h.
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 16, 0, 0).unwrap();
        let plus_nine = DayBoundary::from_offset_hours(9);
        let utc = DayBoundary::from_offset_hours(0);
        assert_eq!(
            plus_nine.day_of(instant),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
        assert_eq!(
            utc.day_of(instant),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn days_between_is_whole_days() {
        let a = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert_eq!(DayBoundary::days_between(a, b), 10);
        assert_eq!(DayBoundary::days_between(b, a), -10);
    }

    #[test]
    fn invalid_offset_falls_back_to_default() {
        let boundary = DayBoundary::from_offset_hours(48);
        assert_eq!(boundary, DayBoundary::default());
    }

    #[test]
    fn today_or_yesterday() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 5, 9).unwrap();
        let older = NaiveDate::from_ymd_opt(2025, 5, 8).unwrap();
        assert!(DayBoundary::is_today_or_yesterday(today, today));
        assert!(DayBoundary::is_today_or_yesterday(yesterday, today));
        assert!(!DayBoundary::is_today_or_yesterday(older, today));
    }
}
