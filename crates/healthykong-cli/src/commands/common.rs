use healthykong_core::{AppConfig, HabitEngine, SqliteStore};

/// Open the engine over the on-disk store with the configured policy.
pub fn open_engine() -> Result<HabitEngine<SqliteStore>, Box<dyn std::error::Error>> {
    let config = AppConfig::load_or_default();
    let store = SqliteStore::open()?;
    Ok(HabitEngine::new(
        store,
        config.day_boundary(),
        config.donation_policy(),
    ))
}
