//! Donor levels.
//!
//! Five contiguous tiers over the cumulative donation total. A user's
//! level is never persisted; it is a total function of the current total,
//! recomputed on demand.

use serde::Serialize;

/// One donor tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DonorLevel {
    /// Tier index, 0-based from the bottom.
    pub rank: u8,
    /// Display name.
    pub name: &'static str,
    /// Inclusive lower bound in points.
    pub min: i64,
    /// Inclusive upper bound in points; `None` for the unbounded top tier.
    pub max: Option<i64>,
    /// Display emoji.
    pub emoji: &'static str,
}

/// Static tier table. Contiguous and non-overlapping; each tier's max is
/// the next tier's min minus 1.
pub static DONOR_LEVELS: [DonorLevel; 5] = [
    DonorLevel {
        rank: 0,
        name: "Seedling",
        min: 0,
        max: Some(4_999),
        emoji: "🌱",
    },
    DonorLevel {
        rank: 1,
        name: "Sprout",
        min: 5_000,
        max: Some(9_999),
        emoji: "🌿",
    },
    DonorLevel {
        rank: 2,
        name: "Sapling",
        min: 10_000,
        max: Some(49_999),
        emoji: "🌳",
    },
    DonorLevel {
        rank: 3,
        name: "Grove",
        min: 50_000,
        max: Some(99_999),
        emoji: "🏞️",
    },
    DonorLevel {
        rank: 4,
        name: "Forest Guardian",
        min: 100_000,
        max: None,
        emoji: "🦍",
    },
];

/// Map a donation total to its tier.
///
/// Total and deterministic: any value outside every range (including
/// negative or otherwise invalid input) falls back to the lowest tier.
pub fn lookup_donor_level(total: i64) -> &'static DonorLevel {
    DONOR_LEVELS
        .iter()
        .find(|level| total >= level.min && level.max.is_none_or(|max| total <= max))
        .unwrap_or(&DONOR_LEVELS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_map_to_expected_ranks() {
        let cases = [
            (0, 0),
            (4_999, 0),
            (5_000, 1),
            (9_999, 1),
            (10_000, 2),
            (50_000, 3),
            (100_000, 4),
            (1_000_000, 4),
        ];
        for (total, rank) in cases {
            assert_eq!(lookup_donor_level(total).rank, rank, "total {total}");
        }
    }

    #[test]
    fn negative_input_falls_back_to_lowest() {
        assert_eq!(lookup_donor_level(-100).rank, 0);
        assert_eq!(lookup_donor_level(i64::MIN).rank, 0);
    }

    #[test]
    fn table_is_contiguous() {
        for pair in DONOR_LEVELS.windows(2) {
            assert_eq!(pair[0].max.unwrap() + 1, pair[1].min);
        }
        assert!(DONOR_LEVELS.last().unwrap().max.is_none());
    }

    #[test]
    fn lookup_is_monotonic() {
        let mut prev = 0;
        for total in (0..200_000).step_by(500) {
            let rank = lookup_donor_level(total).rank;
            assert!(rank >= prev);
            prev = rank;
        }
    }
}
