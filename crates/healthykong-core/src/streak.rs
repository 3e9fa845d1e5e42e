//! Streak and gap calculator.
//!
//! Pure functions over recorded-at instants. Both metrics are derived
//! from the distinct calendar days a user logged on, so they are safe to
//! recompute on every read and from several devices at once.

use chrono::{DateTime, NaiveDate, Utc};

use crate::clock::DayBoundary;

/// Streak and gap for one user, derived from their full log history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakReport {
    /// Consecutive record days ending today or yesterday. 0 if the most
    /// recent record day is older than yesterday.
    pub streak: u32,
    /// Whole days between the two most recent distinct record days.
    /// 0 when fewer than two distinct days exist.
    pub gap_days: i64,
}

/// Reduce instants to their distinct calendar days, newest first.
pub fn distinct_days(timestamps: &[DateTime<Utc>], boundary: &DayBoundary) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = timestamps.iter().map(|t| boundary.day_of(*t)).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();
    days
}

/// Compute streak and gap from raw log instants.
pub fn compute(
    timestamps: &[DateTime<Utc>],
    boundary: &DayBoundary,
    today: NaiveDate,
) -> StreakReport {
    let days = distinct_days(timestamps, boundary);
    StreakReport {
        streak: streak_of_days(&days, today),
        gap_days: gap_of_days(&days),
    }
}

/// Streak over distinct record days sorted newest first.
///
/// Starts at 1 only when the latest day is today or yesterday, then walks
/// the list pairwise while the day-to-day delta is exactly 1.
pub fn streak_of_days(days: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&latest) = days.first() else {
        return 0;
    };
    if !DayBoundary::is_today_or_yesterday(latest, today) {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2) {
        if DayBoundary::days_between(pair[1], pair[0]) == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Days between the two most recent distinct record days; 0 if fewer
/// than two exist.
pub fn gap_of_days(days: &[NaiveDate]) -> i64 {
    match days {
        [latest, previous, ..] => DayBoundary::days_between(*previous, *latest),
        _ => 0,
    }
}
