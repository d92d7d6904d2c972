use crate::errors::TrackerError;
use crate::units::{FeetInches, Unit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated measurement. `weight` is always kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: String,
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// User-supplied entry data; `weight` is in the active display unit.
#[derive(Debug, Clone)]
pub struct EntryInput {
    pub date: NaiveDate,
    pub weight: f64,
    pub notes: Option<String>,
}

impl EntryInput {
    pub fn new(date: NaiveDate, weight: f64, notes: Option<String>) -> Self {
        Self {
            date,
            weight,
            notes: notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

pub fn validate_positive(value: f64, field: &str) -> Result<f64, TrackerError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TrackerError::Validation(format!(
            "{field} must be a positive number"
        )))
    }
}

/// Height as typed by the user, either metric or imperial.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "unit", rename_all = "lowercase")]
pub enum HeightInput {
    Cm { value: f64 },
    Ft {
        #[serde(default)]
        feet: f64,
        #[serde(default)]
        inches: f64,
    },
}

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub date: Option<String>,
    pub weight: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnitRequest {
    pub unit: Unit,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HeightRequest {
    pub height: Option<HeightInput>,
}

/// An entry converted to the display unit.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryView {
    pub id: String,
    pub date: String,
    pub label: String,
    pub weight: f64,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub outcome: String,
    pub entry: EntryView,
    pub streak: u32,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub unit: Unit,
    pub goal: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub height_m: Option<f64>,
    pub height_cm: Option<f64>,
    pub height_ft_in: Option<FeetInches>,
    pub streak: u32,
    pub last_log_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TipResponse {
    pub tip: String,
    pub sequence: u64,
    pub stale: bool,
}
