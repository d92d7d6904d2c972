use crate::bmi::{BmiCategory, calculate_bmi};
use crate::dates::{date_key, short_label};
use crate::models::WeightEntry;
use crate::tracker::Settings;
use crate::units::{Unit, fixed1, round1};
use serde::Serialize;

/// Headline numbers, all in kilograms.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub current_kg: f64,
    pub start_kg: f64,
    pub change_kg: f64,
    pub to_goal_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub streak: u32,
    pub entry_count: usize,
}

/// Expects `entries` most recent first. Returns `None` when there is no data.
pub fn summarize(entries: &[WeightEntry], settings: &Settings) -> Option<Summary> {
    let current_kg = entries.first()?.weight;
    let start_kg = entries.last()?.weight;

    Some(Summary {
        current_kg,
        start_kg,
        change_kg: current_kg - start_kg,
        to_goal_kg: settings.goal_weight_kg.map(|goal| (current_kg - goal).abs()),
        bmi: settings
            .height_m
            .and_then(|height| calculate_bmi(current_kg, height)),
        streak: settings.streak.count,
        entry_count: entries.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub unit: Unit,
    pub current: String,
    pub start: String,
    /// Magnitude of the change.
    pub change: String,
    /// `+X.X` for gains (and no change), `-X.X` for losses.
    pub change_signed: String,
    pub gained: bool,
    pub goal: Option<String>,
    pub to_goal: Option<String>,
    pub bmi: Option<String>,
    pub bmi_category: Option<BmiCategory>,
    pub streak: u32,
    pub entry_count: usize,
}

impl Summary {
    pub fn view(&self, unit: Unit, goal_weight_kg: Option<f64>) -> SummaryView {
        let change = unit.from_kg(self.change_kg);
        let gained = self.change_kg >= 0.0;
        let change_signed = if gained {
            format!("+{}", fixed1(change))
        } else {
            fixed1(change)
        };

        SummaryView {
            unit,
            current: fixed1(unit.from_kg(self.current_kg)),
            start: fixed1(unit.from_kg(self.start_kg)),
            change: fixed1(change.abs()),
            change_signed,
            gained,
            goal: goal_weight_kg.map(|goal| fixed1(unit.from_kg(goal))),
            to_goal: self.to_goal_kg.map(|kg| fixed1(unit.from_kg(kg))),
            bmi: self.bmi.map(fixed1),
            bmi_category: self.bmi.map(BmiCategory::from_bmi),
            streak: self.streak,
            entry_count: self.entry_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressPoint {
    pub date: String,
    pub label: String,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgressSeries {
    InsufficientData,
    Ok {
        unit: Unit,
        points: Vec<ProgressPoint>,
        goal: Option<f64>,
    },
}

/// Oldest-first series for the trend line; needs at least two entries.
pub fn progress_series(
    entries: &[WeightEntry],
    unit: Unit,
    goal_weight_kg: Option<f64>,
) -> ProgressSeries {
    if entries.len() < 2 {
        return ProgressSeries::InsufficientData;
    }

    let mut ordered: Vec<&WeightEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.date);

    let points = ordered
        .into_iter()
        .map(|e| ProgressPoint {
            date: date_key(e.date),
            label: short_label(e.date),
            weight: round1(unit.from_kg(e.weight)),
        })
        .collect();

    ProgressSeries::Ok {
        unit,
        points,
        goal: goal_weight_kg.map(|goal| round1(unit.from_kg(goal))),
    }
}
