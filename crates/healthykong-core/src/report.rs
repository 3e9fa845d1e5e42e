//! Weekly report aggregation.
//!
//! Reduces the trailing seven-day window of a user's logs to the
//! statistics the AI summary is prompted with. Pure over the supplied
//! log list.

use chrono::NaiveDate;
use serde::Serialize;

use crate::clock::DayBoundary;
use crate::event::{HealthLogEvent, Reading};
use crate::streak;

/// Aggregated statistics for one trailing week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    /// First day of the window (inclusive).
    pub week_start: NaiveDate,
    /// Last day of the window (inclusive, "today").
    pub week_end: NaiveDate,
    /// Logs inside the window.
    pub total_records: u64,
    /// Distinct record days inside the window.
    pub record_days: u32,
    pub glucose_count: u64,
    pub blood_pressure_count: u64,
    /// Mean glucose over the window, mg/dL.
    pub avg_glucose: Option<f64>,
    /// Mean systolic/diastolic over the window, mmHg.
    pub avg_systolic: Option<f64>,
    pub avg_diastolic: Option<f64>,
    /// Current consecutive-day streak over the full history.
    pub streak: u32,
}

impl WeeklyReport {
    /// Aggregate the seven days ending on `today`.
    ///
    /// `logs` is the user's full history; the streak intentionally uses
    /// all of it while the counts and averages only see the window.
    pub fn for_week(logs: &[HealthLogEvent], boundary: &DayBoundary, today: NaiveDate) -> Self {
        let week_start = today - chrono::Duration::days(6);
        let in_window: Vec<&HealthLogEvent> = logs
            .iter()
            .filter(|e| {
                let day = boundary.day_of(e.recorded_at);
                day >= week_start && day <= today
            })
            .collect();

        let mut glucose_sum = 0u64;
        let mut glucose_count = 0u64;
        let mut systolic_sum = 0u64;
        let mut diastolic_sum = 0u64;
        let mut bp_count = 0u64;
        for event in &in_window {
            match event.reading {
                Reading::Glucose { mg_dl } => {
                    glucose_sum += mg_dl as u64;
                    glucose_count += 1;
                }
                Reading::BloodPressure {
                    systolic,
                    diastolic,
                } => {
                    systolic_sum += systolic as u64;
                    diastolic_sum += diastolic as u64;
                    bp_count += 1;
                }
            }
        }

        let window_timestamps: Vec<_> = in_window.iter().map(|e| e.recorded_at).collect();
        let record_days = streak::distinct_days(&window_timestamps, boundary).len() as u32;

        let all_timestamps: Vec<_> = logs.iter().map(|e| e.recorded_at).collect();
        let streak = streak::compute(&all_timestamps, boundary, today).streak;

        Self {
            week_start,
            week_end: today,
            total_records: in_window.len() as u64,
            record_days,
            glucose_count,
            blood_pressure_count: bp_count,
            avg_glucose: (glucose_count > 0).then(|| glucose_sum as f64 / glucose_count as f64),
            avg_systolic: (bp_count > 0).then(|| systolic_sum as f64 / bp_count as f64),
            avg_diastolic: (bp_count > 0).then(|| diastolic_sum as f64 / bp_count as f64),
            streak,
        }
    }

    /// Plain-text rendering used as the prompt body (and as the CLI
    /// fallback when no AI endpoint is reachable).
    pub fn to_prompt_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push(format!(
            "Week {} to {}:",
            self.week_start, self.week_end
        ));
        lines.push(format!(
            "- {} measurements on {} days (current streak: {} days)",
            self.total_records, self.record_days, self.streak
        ));
        if let Some(avg) = self.avg_glucose {
            lines.push(format!(
                "- {} glucose readings, average {:.0} mg/dL",
                self.glucose_count, avg
            ));
        }
        if let (Some(sys), Some(dia)) = (self.avg_systolic, self.avg_diastolic) {
            lines.push(format!(
                "- {} blood pressure readings, average {:.0}/{:.0} mmHg",
                self.blood_pressure_count, sys, dia
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DayPhase;
    use chrono::{Duration, TimeZone, Utc};

    fn boundary() -> DayBoundary {
        DayBoundary::from_offset_hours(0)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn event_days_ago(user: &str, ago: i64, reading: Reading) -> HealthLogEvent {
        let mut event = HealthLogEvent::new(user, reading, Some(DayPhase::Fasting));
        event.recorded_at = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap() - Duration::days(ago);
        event
    }

    #[test]
    fn aggregates_only_the_window() {
        let logs = vec![
            event_days_ago("u1", 0, Reading::Glucose { mg_dl: 100 }),
            event_days_ago("u1", 3, Reading::Glucose { mg_dl: 120 }),
            // Outside the 7-day window.
            event_days_ago("u1", 10, Reading::Glucose { mg_dl: 300 }),
        ];
        let report = WeeklyReport::for_week(&logs, &boundary(), today());
        assert_eq!(report.total_records, 2);
        assert_eq!(report.record_days, 2);
        assert_eq!(report.avg_glucose, Some(110.0));
    }

    #[test]
    fn averages_both_kinds() {
        let logs = vec![
            event_days_ago("u1", 0, Reading::Glucose { mg_dl: 90 }),
            event_days_ago(
                "u1",
                1,
                Reading::BloodPressure {
                    systolic: 120,
                    diastolic: 80,
                },
            ),
            event_days_ago(
                "u1",
                2,
                Reading::BloodPressure {
                    systolic: 130,
                    diastolic: 90,
                },
            ),
        ];
        let report = WeeklyReport::for_week(&logs, &boundary(), today());
        assert_eq!(report.glucose_count, 1);
        assert_eq!(report.blood_pressure_count, 2);
        assert_eq!(report.avg_systolic, Some(125.0));
        assert_eq!(report.avg_diastolic, Some(85.0));
    }

    #[test]
    fn empty_history_has_no_averages() {
        let report = WeeklyReport::for_week(&[], &boundary(), today());
        assert_eq!(report.total_records, 0);
        assert!(report.avg_glucose.is_none());
        assert!(report.avg_systolic.is_none());
        assert_eq!(report.streak, 0);
    }

    #[test]
    fn prompt_text_mentions_the_numbers() {
        let logs = vec![event_days_ago("u1", 0, Reading::Glucose { mg_dl: 100 })];
        let report = WeeklyReport::for_week(&logs, &boundary(), today());
        let text = report.to_prompt_text();
        assert!(text.contains("1 measurements on 1 days"));
        assert!(text.contains("100 mg/dL"));
        assert!(!text.contains("blood pressure"));
    }
}
