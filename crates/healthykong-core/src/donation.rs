//! Donation transaction policy.
//!
//! The first qualifying log of a calendar day awards one fixed donation
//! unit. The decision itself is a pure function; the store applies it
//! inside its own transaction so two rapid same-day submissions cannot
//! double-award.
//!
//! A monthly cap (the figure from the service terms) is enforced as a
//! guarded step: once a month's awarded units reach the cap, further
//! first-of-day logs still stamp the last-record date (so streaks keep
//! working) but no longer grow the total.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Points awarded for the first qualifying log of a day.
pub const DONATION_UNIT: i64 = 100;

/// Default monthly ceiling on awarded units, in points.
pub const DEFAULT_MONTHLY_CAP: i64 = 3000;

/// Donation award rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationPolicy {
    /// Points per donation day.
    pub unit: i64,
    /// Monthly ceiling on awarded points; `None` disables the cap.
    pub monthly_cap: Option<i64>,
}

impl DonationPolicy {
    /// Policy with no monthly ceiling.
    pub fn uncapped() -> Self {
        Self {
            unit: DONATION_UNIT,
            monthly_cap: None,
        }
    }
}

impl Default for DonationPolicy {
    fn default() -> Self {
        Self {
            unit: DONATION_UNIT,
            monthly_cap: Some(DEFAULT_MONTHLY_CAP),
        }
    }
}

/// Outcome of assessing one log submission against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationDecision {
    /// Whether this is the first log of `today` for the user.
    pub first_of_day: bool,
    /// First of day, but the monthly cap blocked the award.
    pub capped: bool,
    /// Donation total after the decision. Never below the input total.
    pub new_total: i64,
    /// Last-record date after the decision.
    pub new_last_date: Option<NaiveDate>,
}

impl DonationPolicy {
    /// Decide whether a submission on `today` awards a unit.
    ///
    /// `month_awarded` is the number of points already awarded within
    /// `today`'s calendar month; the store derives it from the donation
    /// day keys it holds. Pure; the caller is responsible for running the
    /// read-decide-write cycle atomically.
    pub fn assess(
        &self,
        current_total: i64,
        last_record_date: Option<NaiveDate>,
        today: NaiveDate,
        month_awarded: i64,
    ) -> DonationDecision {
        let first_of_day = last_record_date != Some(today);
        if !first_of_day {
            return DonationDecision {
                first_of_day: false,
                capped: false,
                new_total: current_total,
                new_last_date: last_record_date,
            };
        }

        let capped = self
            .monthly_cap
            .is_some_and(|cap| month_awarded + self.unit > cap);

        DonationDecision {
            first_of_day: true,
            capped,
            new_total: if capped {
                current_total
            } else {
                current_total + self.unit
            },
            new_last_date: Some(today),
        }
    }

    /// Points already awarded in `month`'s calendar month, given the
    /// distinct donation day keys of that month.
    pub fn month_awarded(&self, donation_days: &[NaiveDate], month: NaiveDate) -> i64 {
        let count = donation_days
            .iter()
            .filter(|d| d.year() == month.year() && d.month() == month.month())
            .count() as i64;
        count * self.unit
    }
}
