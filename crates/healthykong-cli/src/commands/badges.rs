use clap::Subcommand;
use healthykong_core::BADGE_CATALOG;
use serde::Serialize;

use super::common::open_engine;

#[derive(Subcommand)]
pub enum BadgesAction {
    /// The full badge catalog
    Catalog,
    /// Badges a user has earned
    List {
        /// User ID
        user: String,
    },
    /// Re-evaluate the catalog against the user's current metrics
    Check {
        /// User ID
        user: String,
    },
}

#[derive(Serialize)]
struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: healthykong_core::BadgeCategory,
}

pub fn run(action: BadgesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BadgesAction::Catalog => {
            let entries: Vec<CatalogEntry> = BADGE_CATALOG
                .iter()
                .map(|b| CatalogEntry {
                    id: b.id,
                    name: b.name,
                    description: b.description,
                    category: b.category,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        BadgesAction::List { user } => {
            let engine = open_engine()?;
            let summary = engine.user_summary(&user)?;
            println!("{}", serde_json::to_string_pretty(&summary.badges)?);
        }
        BadgesAction::Check { user } => {
            let mut engine = open_engine()?;
            let metrics = engine.metrics_snapshot(&user)?;
            let granted = engine.evaluate_badges(&user, &metrics);
            if granted.is_empty() {
                println!("No new badges.");
            } else {
                println!("{}", serde_json::to_string_pretty(&granted)?);
            }
        }
    }
    Ok(())
}
