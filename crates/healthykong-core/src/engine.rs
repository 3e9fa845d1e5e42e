//! Habit-to-reward rule engine.
//!
//! The facade the presentation layer calls: submit a log, list logs,
//! derive the metrics snapshot, evaluate badges. The engine owns no
//! threads, locks or retry loops; every multi-step mutation is one atomic
//! store operation, and everything else is a pure function over durable
//! data, safe to recompute from any number of devices at once.

use crate::badges::{newly_qualified, BadgeMetrics};
use crate::clock::DayBoundary;
use crate::donation::DonationPolicy;
use crate::error::CoreError;
use crate::event::{HealthLogEvent, ReadingKind};
use crate::levels::{lookup_donor_level, DonorLevel};
use crate::store::{RecordStore, SubmitOutcome, UserSummary};
use crate::streak::{self, StreakReport};

/// Outcome of the full submit-then-evaluate flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardOutcome {
    pub submit: SubmitOutcome,
    /// Badge IDs newly granted by this submission. Empty if the grant
    /// could not be persisted.
    pub new_badges: Vec<String>,
}

/// The rule engine, generic over its record store.
pub struct HabitEngine<S: RecordStore> {
    store: S,
    boundary: DayBoundary,
    policy: DonationPolicy,
}

impl<S: RecordStore> HabitEngine<S> {
    pub fn new(store: S, boundary: DayBoundary, policy: DonationPolicy) -> Self {
        Self {
            store,
            boundary,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn boundary(&self) -> &DayBoundary {
        &self.boundary
    }

    /// Create the user's summary record. Account creation stand-in;
    /// idempotent.
    pub fn provision_user(&mut self, user_id: &str) -> Result<(), CoreError> {
        self.store.create_user(user_id)?;
        Ok(())
    }

    /// Current summary for a user.
    pub fn user_summary(&self, user_id: &str) -> Result<UserSummary, CoreError> {
        Ok(self.store.user_summary(user_id)?)
    }

    /// Submit one health log.
    ///
    /// Validates the event, derives its calendar day from the configured
    /// boundary, then delegates the donation decision and the log append
    /// to the store as a single atomic unit.
    ///
    /// # Errors
    /// `Validation` for malformed input (nothing is written),
    /// `Store(NotFound)` if the user was never provisioned,
    /// `Store(Transient)` on store conflict (the caller may retry).
    pub fn submit_health_log(&mut self, event: &HealthLogEvent) -> Result<SubmitOutcome, CoreError> {
        event.validate()?;
        let today = self.boundary.day_of(event.recorded_at);
        Ok(self.store.submit_log(event, today, &self.policy)?)
    }

    /// All logs for a user, newest first.
    pub fn list_health_logs(&self, user_id: &str) -> Result<Vec<HealthLogEvent>, CoreError> {
        Ok(self.store.logs_for_user(user_id)?)
    }

    /// Derive the badge metrics snapshot from the user's durable state.
    pub fn metrics_snapshot(&self, user_id: &str) -> Result<BadgeMetrics, CoreError> {
        let summary = self.store.user_summary(user_id)?;
        let logs = self.store.logs_for_user(user_id)?;
        Ok(self.metrics_from(&summary, &logs))
    }

    /// Metrics from an already-fetched summary and log list.
    pub fn metrics_from(&self, summary: &UserSummary, logs: &[HealthLogEvent]) -> BadgeMetrics {
        let timestamps: Vec<_> = logs.iter().map(|e| e.recorded_at).collect();
        let StreakReport { streak, gap_days } =
            streak::compute(&timestamps, &self.boundary, self.boundary.today());

        BadgeMetrics {
            total_records: logs.len() as u64,
            streak,
            gap_days,
            donation_total: summary.total_donation,
            has_glucose: logs
                .iter()
                .any(|e| e.reading.kind() == ReadingKind::Glucose),
            has_blood_pressure: logs
                .iter()
                .any(|e| e.reading.kind() == ReadingKind::BloodPressure),
        }
    }

    /// Evaluate the badge catalog against `metrics` and persist any new
    /// grants.
    ///
    /// The observable result is gated on persistence: if the badge-set
    /// write fails, this reports zero new badges rather than claiming
    /// grants that did not commit. "No new badges" is a normal empty
    /// result, never an error.
    pub fn evaluate_badges(&mut self, user_id: &str, metrics: &BadgeMetrics) -> Vec<String> {
        let owned = match self.store.user_summary(user_id) {
            Ok(summary) => summary.badges,
            Err(e) => {
                eprintln!("Warning: badge evaluation skipped for '{user_id}': {e}");
                return Vec::new();
            }
        };

        let qualified = newly_qualified(metrics, |id| owned.contains(id));
        if qualified.is_empty() {
            return Vec::new();
        }

        match self.store.merge_badges(user_id, &qualified) {
            Ok(new_ids) => new_ids,
            Err(e) => {
                eprintln!("Warning: failed to persist badge grant for '{user_id}': {e}");
                Vec::new()
            }
        }
    }

    /// The full control flow for one submission: donation transaction,
    /// metrics recomputation, badge evaluation.
    pub fn submit_and_evaluate(&mut self, event: &HealthLogEvent) -> Result<RewardOutcome, CoreError> {
        let submit = self.submit_health_log(event)?;
        let metrics = self.metrics_snapshot(&event.user_id)?;
        let new_badges = self.evaluate_badges(&event.user_id, &metrics);
        Ok(RewardOutcome { submit, new_badges })
    }

    /// Donor level for a user's current total.
    pub fn donor_level(&self, user_id: &str) -> Result<&'static DonorLevel, CoreError> {
        let summary = self.store.user_summary(user_id)?;
        Ok(lookup_donor_level(summary.total_donation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, ValidationError};
    use crate::event::Reading;
    use crate::store::SqliteStore;

    fn engine() -> HabitEngine<SqliteStore> {
        HabitEngine::new(
            SqliteStore::open_memory().unwrap(),
            DayBoundary::from_offset_hours(0),
            DonationPolicy::uncapped(),
        )
    }

    #[test]
    fn invalid_event_is_rejected_before_the_store() {
        let mut engine = engine();
        engine.provision_user("u1").unwrap();
        let event = HealthLogEvent::new("u1", Reading::Glucose { mg_dl: 0 }, None);

        let result = engine.submit_health_log(&event);
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::InvalidReading { .. }))
        ));
        // Nothing was partially applied.
        assert!(engine.list_health_logs("u1").unwrap().is_empty());
    }

    #[test]
    fn unprovisioned_user_is_not_found() {
        let mut engine = engine();
        let event = HealthLogEvent::new("ghost", Reading::Glucose { mg_dl: 90 }, None);
        assert!(matches!(
            engine.submit_health_log(&event),
            Err(CoreError::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn first_ever_log_awards_and_badges() {
        let mut engine = engine();
        engine.provision_user("u1").unwrap();
        let event = HealthLogEvent::new("u1", Reading::Glucose { mg_dl: 95 }, None);

        let outcome = engine.submit_and_evaluate(&event).unwrap();
        assert!(outcome.submit.first_donation_of_day);
        assert_eq!(outcome.submit.new_total, 100);
        assert!(outcome.new_badges.contains(&"first-record".to_string()));
        assert!(outcome.new_badges.contains(&"first-donation".to_string()));
    }

    #[test]
    fn badge_evaluation_is_idempotent() {
        let mut engine = engine();
        engine.provision_user("u1").unwrap();
        let event = HealthLogEvent::new("u1", Reading::Glucose { mg_dl: 95 }, None);
        engine.submit_and_evaluate(&event).unwrap();

        let metrics = engine.metrics_snapshot("u1").unwrap();
        let again = engine.evaluate_badges("u1", &metrics);
        assert!(again.is_empty());
    }

    #[test]
    fn evaluate_badges_swallows_missing_user() {
        let mut engine = engine();
        let metrics = BadgeMetrics {
            total_records: 1,
            ..Default::default()
        };
        assert!(engine.evaluate_badges("ghost", &metrics).is_empty());
    }

    #[test]
    fn donor_level_tracks_total() {
        let mut engine = engine();
        engine.provision_user("u1").unwrap();
        assert_eq!(engine.donor_level("u1").unwrap().rank, 0);
    }
}
