//! TOML-based application configuration.
//!
//! Stores:
//! - Day-boundary offset (which calendar day a log falls on)
//! - Donation policy knobs (monthly cap)
//! - AI insights endpoint and model
//!
//! Configuration is stored at `~/.config/healthykong/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::clock::{DayBoundary, DEFAULT_OFFSET_HOURS};
use crate::donation::{DonationPolicy, DEFAULT_MONTHLY_CAP, DONATION_UNIT};

/// Donation policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationConfig {
    /// Monthly ceiling on awarded points. 0 disables the cap.
    #[serde(default = "default_monthly_cap")]
    pub monthly_cap: i64,
}

/// AI insights configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_insights_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_insights_model")]
    pub model: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/healthykong/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Day-boundary offset in whole hours east of UTC. Determines which
    /// calendar day a submission belongs to, and therefore donation
    /// eligibility at midnight boundaries.
    #[serde(default = "default_day_offset")]
    pub day_offset_hours: i32,
    #[serde(default)]
    pub donation: DonationConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
}

// Default functions
fn default_day_offset() -> i32 {
    DEFAULT_OFFSET_HOURS
}
fn default_monthly_cap() -> i64 {
    DEFAULT_MONTHLY_CAP
}
fn default_insights_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}
fn default_insights_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for DonationConfig {
    fn default() -> Self {
        Self {
            monthly_cap: default_monthly_cap(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_insights_endpoint(),
            model: default_insights_model(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            day_offset_hours: default_day_offset(),
            donation: DonationConfig::default(),
            insights: InsightsConfig::default(),
        }
    }
}

impl AppConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(format!("cannot parse '{value}' as number").into());
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}").into())
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: AppConfig = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    /// The configured day boundary.
    pub fn day_boundary(&self) -> DayBoundary {
        DayBoundary::from_offset_hours(self.day_offset_hours)
    }

    /// The configured donation policy. A zero cap disables it.
    pub fn donation_policy(&self) -> DonationPolicy {
        DonationPolicy {
            unit: DONATION_UNIT,
            monthly_cap: match self.donation.monthly_cap {
                cap if cap > 0 => Some(cap),
                _ => None,
            },
        }
    }
}
