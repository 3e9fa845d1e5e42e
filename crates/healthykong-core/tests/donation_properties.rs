//! Property tests for the donation-total invariant.
//!
//! Without a cap, the cumulative total must equal 100 times the number
//! of distinct calendar days with at least one submission, no matter how
//! submissions cluster within days.

use chrono::{Duration, TimeZone, Utc};
use healthykong_core::{
    DayBoundary, DonationPolicy, HabitEngine, HealthLogEvent, Reading, SqliteStore, DONATION_UNIT,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn engine() -> HabitEngine<SqliteStore> {
    HabitEngine::new(
        SqliteStore::open_memory().unwrap(),
        DayBoundary::from_offset_hours(0),
        DonationPolicy::uncapped(),
    )
}

proptest! {
    #[test]
    fn total_is_unit_times_distinct_days(days in prop::collection::btree_set(0i64..60, 1..15)) {
        let mut engine = engine();
        engine.provision_user("u1").unwrap();
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();

        for &day in &days {
            // One to three logs per day, spread across the day.
            let logs_today = 1 + (day % 3) as u32;
            for k in 0..logs_today {
                let mut event =
                    HealthLogEvent::new("u1", Reading::Glucose { mg_dl: 90 + k }, None);
                event.recorded_at = base + Duration::days(day) + Duration::hours(k as i64 * 3);
                engine.submit_health_log(&event).unwrap();
            }
        }

        let summary = engine.user_summary("u1").unwrap();
        prop_assert_eq!(
            summary.total_donation,
            DONATION_UNIT * days.len() as i64
        );
    }

    #[test]
    fn repeated_days_award_once(mut days in prop::collection::vec(0i64..30, 1..12)) {
        let mut engine = engine();
        engine.provision_user("u1").unwrap();
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

        // Chronological arrival with arbitrary same-day repeats.
        days.sort_unstable();
        for &day in &days {
            let mut event = HealthLogEvent::new("u1", Reading::Glucose { mg_dl: 100 }, None);
            event.recorded_at = base + Duration::days(day);
            engine.submit_health_log(&event).unwrap();
        }

        let distinct: BTreeSet<i64> = days.iter().copied().collect();
        let summary = engine.user_summary("u1").unwrap();
        prop_assert_eq!(
            summary.total_donation,
            DONATION_UNIT * distinct.len() as i64
        );
    }
}
