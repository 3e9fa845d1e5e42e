//! Health log events.
//!
//! One event is one self-reported measurement. Events are immutable once
//! created and append-only in the store; the two measurement kinds are an
//! explicit tagged union rather than one loose record with optional
//! fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// The measurement carried by a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reading {
    /// Blood glucose, mg/dL.
    Glucose { mg_dl: u32 },
    /// Blood pressure, mmHg.
    BloodPressure { systolic: u32, diastolic: u32 },
}

impl Reading {
    /// Stable kind tag, used as the store's `kind` column and in CLI output.
    pub fn kind(&self) -> ReadingKind {
        match self {
            Reading::Glucose { .. } => ReadingKind::Glucose,
            Reading::BloodPressure { .. } => ReadingKind::BloodPressure,
        }
    }
}

/// Measurement kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingKind {
    Glucose,
    BloodPressure,
}

impl ReadingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Glucose => "glucose",
            ReadingKind::BloodPressure => "blood_pressure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "glucose" => Some(ReadingKind::Glucose),
            "blood_pressure" => Some(ReadingKind::BloodPressure),
            _ => None,
        }
    }
}

/// When during the day the measurement was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    Fasting,
    PostMeal,
    Bedtime,
}

impl DayPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPhase::Fasting => "fasting",
            DayPhase::PostMeal => "post_meal",
            DayPhase::Bedtime => "bedtime",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fasting" => Some(DayPhase::Fasting),
            "post_meal" => Some(DayPhase::PostMeal),
            "bedtime" => Some(DayPhase::Bedtime),
            _ => None,
        }
    }
}

/// One self-reported measurement, owned exclusively by its user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthLogEvent {
    /// Event ID
    pub id: Uuid,

    /// Owning user
    pub user_id: String,

    /// The measurement
    pub reading: Reading,

    /// Optional day-phase tag
    pub phase: Option<DayPhase>,

    /// Instant the measurement was recorded (not just a date)
    pub recorded_at: DateTime<Utc>,
}

impl HealthLogEvent {
    /// Build a new event stamped with the current instant.
    pub fn new(user_id: &str, reading: Reading, phase: Option<DayPhase>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            reading,
            phase,
            recorded_at: Utc::now(),
        }
    }

    /// Reject malformed input before any store interaction.
    ///
    /// # Errors
    /// Returns a `ValidationError` for a missing user, a non-positive
    /// reading, or a blood-pressure pair with diastolic >= systolic.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("user_id".into()));
        }
        match self.reading {
            Reading::Glucose { mg_dl } => {
                if mg_dl == 0 {
                    return Err(ValidationError::InvalidReading {
                        field: "mg_dl".into(),
                        message: "glucose reading must be positive".into(),
                    });
                }
            }
            Reading::BloodPressure {
                systolic,
                diastolic,
            } => {
                if systolic == 0 || diastolic == 0 {
                    return Err(ValidationError::InvalidReading {
                        field: "blood_pressure".into(),
                        message: "both readings must be positive".into(),
                    });
                }
                if diastolic >= systolic {
                    return Err(ValidationError::InvalidReading {
                        field: "diastolic".into(),
                        message: format!(
                            "diastolic ({diastolic}) must be below systolic ({systolic})"
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
