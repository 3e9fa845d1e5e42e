use clap::Subcommand;
use healthykong_core::{DayPhase, HealthLogEvent, Reading};

use super::common::open_engine;

#[derive(Subcommand)]
pub enum LogAction {
    /// Record a blood glucose measurement
    Glucose {
        /// User ID
        user: String,
        /// Reading in mg/dL
        mg_dl: u32,
        /// Day phase: fasting, post_meal or bedtime
        #[arg(long)]
        phase: Option<String>,
    },
    /// Record a blood pressure measurement
    Bp {
        /// User ID
        user: String,
        /// Systolic reading in mmHg
        systolic: u32,
        /// Diastolic reading in mmHg
        diastolic: u32,
        /// Day phase: fasting, post_meal or bedtime
        #[arg(long)]
        phase: Option<String>,
    },
    /// List all logs for a user, newest first
    List {
        /// User ID
        user: String,
    },
}

fn parse_phase(phase: Option<String>) -> Result<Option<DayPhase>, Box<dyn std::error::Error>> {
    match phase {
        None => Ok(None),
        Some(p) => DayPhase::parse(&p)
            .map(Some)
            .ok_or_else(|| format!("unknown day phase: {p}").into()),
    }
}

fn submit(event: HealthLogEvent) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;
    let outcome = engine.submit_and_evaluate(&event)?;

    if outcome.submit.first_donation_of_day {
        println!(
            "First log of the day! +100 points donated (total: {})",
            outcome.submit.new_total
        );
    } else if outcome.submit.capped {
        println!(
            "Logged. Monthly donation cap reached (total: {})",
            outcome.submit.new_total
        );
    } else {
        println!("Logged. Total: {}", outcome.submit.new_total);
    }

    for id in &outcome.new_badges {
        if let Some(badge) = healthykong_core::badge_by_id(id) {
            println!("New badge: {} -- {}", badge.name, badge.description);
        }
    }
    Ok(())
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LogAction::Glucose { user, mg_dl, phase } => {
            let event = HealthLogEvent::new(&user, Reading::Glucose { mg_dl }, parse_phase(phase)?);
            submit(event)
        }
        LogAction::Bp {
            user,
            systolic,
            diastolic,
            phase,
        } => {
            let event = HealthLogEvent::new(
                &user,
                Reading::BloodPressure {
                    systolic,
                    diastolic,
                },
                parse_phase(phase)?,
            );
            submit(event)
        }
        LogAction::List { user } => {
            let engine = open_engine()?;
            let logs = engine.list_health_logs(&user)?;
            println!("{}", serde_json::to_string_pretty(&logs)?);
            Ok(())
        }
    }
}
