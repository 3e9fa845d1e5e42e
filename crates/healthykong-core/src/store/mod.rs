//! Record store: persistence for user summaries, health logs and the
//! community feed.
//!
//! The engine talks to the store through the [`RecordStore`] trait; the
//! SQLite implementation is the production store. Every atomic
//! read-modify-write (the donation transaction, the badge union) happens
//! inside one store transaction, never as separate read-then-write calls
//! from the engine.

pub mod config;
pub mod migrations;
pub mod sqlite;

pub use config::AppConfig;
pub use sqlite::SqliteStore;

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::donation::DonationPolicy;
use crate::error::StoreError;
use crate::event::HealthLogEvent;

/// Returns `~/.config/healthykong[-dev]/` based on HEALTHYKONG_ENV.
///
/// Set HEALTHYKONG_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HEALTHYKONG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("healthykong-dev")
    } else {
        base_dir.join("healthykong")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Per-user mutable summary record.
///
/// Mutated only by the donation transaction (total + last-record date)
/// and the badge union (badge set). The badge set only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    /// Cumulative donation total in points. Monotonically non-decreasing.
    pub total_donation: i64,
    /// Day of the most recent donation-triggering event.
    pub last_record_date: Option<NaiveDate>,
    /// Earned badge IDs.
    pub badges: BTreeSet<String>,
}

/// Result of one log submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    /// This was the first log of the day, so a donation was assessed.
    pub first_donation_of_day: bool,
    /// First of day, but the monthly cap blocked the award.
    pub capped: bool,
    /// Donation total after the submission.
    pub new_total: i64,
}

/// Storage the rule engine needs.
///
/// Implementations must make `submit_log` and `merge_badges` atomic with
/// respect to concurrent calls for the same user; the engine never holds
/// locks of its own.
pub trait RecordStore {
    /// Create the summary row for a new user. Idempotent.
    fn create_user(&mut self, user_id: &str) -> Result<(), StoreError>;

    /// Fetch a user's summary. `NotFound` if the user was never provisioned.
    fn user_summary(&self, user_id: &str) -> Result<UserSummary, StoreError>;

    /// Append a log and apply the donation policy for `today`, as one
    /// atomic unit. Either both the summary update and the log append are
    /// observed, or neither.
    fn submit_log(
        &mut self,
        event: &HealthLogEvent,
        today: NaiveDate,
        policy: &DonationPolicy,
    ) -> Result<SubmitOutcome, StoreError>;

    /// All logs for a user, newest first. Empty if none.
    fn logs_for_user(&self, user_id: &str) -> Result<Vec<HealthLogEvent>, StoreError>;

    /// Atomically union `qualified` into the user's badge set and return
    /// the IDs that were actually new. Re-adding a held badge is a no-op.
    fn merge_badges(
        &mut self,
        user_id: &str,
        qualified: &[&str],
    ) -> Result<Vec<String>, StoreError>;
}
