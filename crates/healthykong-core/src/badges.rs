//! Badge catalog and evaluation.
//!
//! Badges are one-way achievement flags. The catalog is a static table;
//! every badge's predicate is checked independently against the current
//! metrics snapshot, so award order never matters and the scan has no
//! cross-badge short-circuiting.

use serde::Serialize;

/// Badge grouping for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Routine,
    Donation,
    Challenge,
}

/// Derived metrics a badge predicate can see.
///
/// A snapshot of durable state at one instant; evaluation is pure over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BadgeMetrics {
    /// Total log events ever recorded.
    pub total_records: u64,
    /// Current consecutive-day streak.
    pub streak: u32,
    /// Days between the two most recent distinct record days.
    pub gap_days: i64,
    /// Cumulative donation total in points.
    pub donation_total: i64,
    /// At least one glucose log exists.
    pub has_glucose: bool,
    /// At least one blood-pressure log exists.
    pub has_blood_pressure: bool,
}

/// One entry in the static badge catalog.
pub struct Badge {
    /// Stable identifier persisted in the user's badge set.
    pub id: &'static str,
    pub category: BadgeCategory,
    pub name: &'static str,
    pub description: &'static str,
    /// Eligibility predicate over the metrics snapshot.
    pub predicate: fn(&BadgeMetrics) -> bool,
}

/// The full badge catalog. Immutable, loaded once, never mutated at
/// runtime.
pub static BADGE_CATALOG: [Badge; 11] = [
    Badge {
        id: "first-record",
        category: BadgeCategory::Routine,
        name: "First Step",
        description: "Recorded your very first measurement",
        predicate: |m| m.total_records == 1,
    },
    Badge {
        id: "streak-3",
        category: BadgeCategory::Routine,
        name: "Warming Up",
        description: "Logged three days in a row",
        predicate: |m| m.streak >= 3,
    },
    Badge {
        id: "streak-7",
        category: BadgeCategory::Routine,
        name: "One Full Week",
        description: "Logged seven days in a row",
        predicate: |m| m.streak >= 7,
    },
    Badge {
        id: "streak-30",
        category: BadgeCategory::Routine,
        name: "Habit Formed",
        description: "Logged thirty days in a row",
        predicate: |m| m.streak >= 30,
    },
    Badge {
        id: "first-donation",
        category: BadgeCategory::Donation,
        name: "First Donation",
        description: "Earned your first donation",
        predicate: |m| m.donation_total >= 100,
    },
    Badge {
        id: "donation-1k",
        category: BadgeCategory::Donation,
        name: "Generous Heart",
        description: "Reached 1,000 donated points",
        predicate: |m| m.donation_total >= 1_000,
    },
    Badge {
        id: "donation-5k",
        category: BadgeCategory::Donation,
        name: "Big Giver",
        description: "Reached 5,000 donated points",
        predicate: |m| m.donation_total >= 5_000,
    },
    Badge {
        id: "donation-10k",
        category: BadgeCategory::Donation,
        name: "Philanthropist",
        description: "Reached 10,000 donated points",
        predicate: |m| m.donation_total >= 10_000,
    },
    Badge {
        id: "comeback",
        category: BadgeCategory::Challenge,
        name: "Welcome Back",
        description: "Returned after a week or more away",
        // Requires having previously lapsed; a brand-new user with a
        // single record must not qualify.
        predicate: |m| m.gap_days >= 7 && m.total_records > 1,
    },
    Badge {
        id: "all-rounder",
        category: BadgeCategory::Challenge,
        name: "All-Rounder",
        description: "Logged both glucose and blood pressure",
        predicate: |m| m.has_glucose && m.has_blood_pressure,
    },
    Badge {
        id: "fifty-records",
        category: BadgeCategory::Challenge,
        name: "Fifty Strong",
        description: "Recorded fifty measurements",
        predicate: |m| m.total_records >= 50,
    },
];

/// Look up a catalog entry by ID.
pub fn badge_by_id(id: &str) -> Option<&'static Badge> {
    BADGE_CATALOG.iter().find(|b| b.id == id)
}

/// IDs qualified under `metrics` but not yet in `owned`.
///
/// Pure; the caller persists the union and only then reports the result
/// to the user.
pub fn newly_qualified(
    metrics: &BadgeMetrics,
    owned: impl Fn(&str) -> bool,
) -> Vec<&'static str> {
    BADGE_CATALOG
        .iter()
        .filter(|badge| !owned(badge.id) && (badge.predicate)(metrics))
        .map(|badge| badge.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn none_owned(_: &str) -> bool {
        false
    }

    #[test]
    fn first_record_requires_exactly_one() {
        let mut metrics = BadgeMetrics {
            total_records: 1,
            ..Default::default()
        };
        assert!(newly_qualified(&metrics, none_owned).contains(&"first-record"));

        metrics.total_records = 2;
        assert!(!newly_qualified(&metrics, none_owned).contains(&"first-record"));
    }

    #[test]
    fn donation_ladder_grants_all_reached_rungs() {
        let metrics = BadgeMetrics {
            donation_total: 5_000,
            ..Default::default()
        };
        let ids = newly_qualified(&metrics, none_owned);
        assert!(ids.contains(&"first-donation"));
        assert!(ids.contains(&"donation-1k"));
        assert!(ids.contains(&"donation-5k"));
        assert!(!ids.contains(&"donation-10k"));
    }

    #[test]
    fn comeback_needs_prior_history() {
        // A brand-new user has gap 0 and one record: no comeback badge.
        let fresh = BadgeMetrics {
            total_records: 1,
            ..Default::default()
        };
        assert!(!newly_qualified(&fresh, none_owned).contains(&"comeback"));

        // Gap alone is not enough either.
        let odd = BadgeMetrics {
            total_records: 1,
            gap_days: 9,
            ..Default::default()
        };
        assert!(!newly_qualified(&odd, none_owned).contains(&"comeback"));

        let lapsed = BadgeMetrics {
            total_records: 2,
            gap_days: 9,
            ..Default::default()
        };
        assert!(newly_qualified(&lapsed, none_owned).contains(&"comeback"));
    }

    #[test]
    fn owned_badges_are_excluded() {
        let metrics = BadgeMetrics {
            total_records: 1,
            donation_total: 100,
            ..Default::default()
        };
        let owned: BTreeSet<&str> = ["first-record"].into();
        let ids = newly_qualified(&metrics, |id| owned.contains(id));
        assert!(!ids.contains(&"first-record"));
        assert!(ids.contains(&"first-donation"));
    }

    #[test]
    fn evaluation_is_idempotent_once_owned() {
        let metrics = BadgeMetrics {
            streak: 7,
            total_records: 10,
            donation_total: 700,
            has_glucose: true,
            has_blood_pressure: true,
            ..Default::default()
        };
        let first: BTreeSet<String> = newly_qualified(&metrics, none_owned)
            .into_iter()
            .map(String::from)
            .collect();
        assert!(!first.is_empty());

        let second = newly_qualified(&metrics, |id| first.contains(id));
        assert!(second.is_empty());
    }

    #[test]
    fn catalog_ids_are_unique() {
        let ids: BTreeSet<&str> = BADGE_CATALOG.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), BADGE_CATALOG.len());
    }

    #[test]
    fn badge_by_id_finds_entries() {
        assert_eq!(badge_by_id("streak-7").unwrap().name, "One Full Week");
        assert!(badge_by_id("nope").is_none());
    }
}
