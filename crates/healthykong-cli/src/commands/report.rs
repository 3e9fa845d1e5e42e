use clap::Subcommand;
use healthykong_core::{AppConfig, InsightsClient, WeeklyReport};

use super::common::open_engine;

#[derive(Subcommand)]
pub enum ReportAction {
    /// This week's aggregated statistics
    Week {
        /// User ID
        user: String,
    },
    /// AI-generated weekly summary
    Insights {
        /// User ID
        user: String,
    },
    /// Store the insights API key in the OS keyring
    SetKey {
        /// API key for the insights endpoint
        key: String,
    },
}

fn weekly_report(user: &str) -> Result<WeeklyReport, Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let logs = engine.list_health_logs(user)?;
    Ok(WeeklyReport::for_week(
        &logs,
        engine.boundary(),
        engine.boundary().today(),
    ))
}

pub fn run(action: ReportAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReportAction::Week { user } => {
            let report = weekly_report(&user)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportAction::Insights { user } => {
            let report = weekly_report(&user)?;
            let config = AppConfig::load_or_default();
            let client = InsightsClient::from_config(&config.insights)?;

            let runtime = tokio::runtime::Runtime::new()?;
            let text = runtime.block_on(client.generate(&report))?;
            println!("{text}");
        }
        ReportAction::SetKey { key } => {
            InsightsClient::store_api_key(&key)?;
            println!("Insights API key stored.");
        }
    }
    Ok(())
}
