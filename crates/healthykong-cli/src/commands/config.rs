use clap::Subcommand;
use healthykong_core::AppConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the full configuration
    Show,
    /// Get a value by dot-separated key
    Get {
        /// Key, e.g. donation.monthly_cap
        key: String,
    },
    /// Set a value by dot-separated key
    Set {
        /// Key, e.g. day_offset_hours
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = AppConfig::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => {
            let config = AppConfig::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = AppConfig::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
