use healthykong_core::lookup_donor_level;
use serde::Serialize;

use super::common::open_engine;

#[derive(Serialize)]
struct Status {
    user_id: String,
    total_donation: i64,
    donor_level: &'static str,
    donor_rank: u8,
    streak: u32,
    gap_days: i64,
    total_records: u64,
    badges: Vec<String>,
}

pub fn run(user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let summary = engine.user_summary(user)?;
    let metrics = engine.metrics_snapshot(user)?;
    let level = lookup_donor_level(summary.total_donation);

    let status = Status {
        user_id: summary.user_id.clone(),
        total_donation: summary.total_donation,
        donor_level: level.name,
        donor_rank: level.rank,
        streak: metrics.streak,
        gap_days: metrics.gap_days,
        total_records: metrics.total_records,
        badges: summary.badges.iter().cloned().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
