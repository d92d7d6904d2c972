use crate::dates::{iso_week, week_label};
use crate::models::WeightEntry;
use crate::units::{Unit, round1};
use serde::Serialize;
use std::collections::BTreeMap;

pub const WEEK_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAverage {
    pub year: i32,
    pub week: u32,
    pub label: String,
    pub entries: usize,
    pub average_weight_kg: f64,
    #[serde(skip)]
    mean_kg: f64,
}

impl WeeklyAverage {
    /// Average in `unit`, converted from the unrounded mean.
    pub fn average_in(&self, unit: Unit) -> f64 {
        round1(unit.from_kg(self.mean_kg))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeeklyComparison {
    InsufficientData,
    Weeks(Vec<WeeklyAverage>),
}

/// Groups entries by ISO week and averages each week, keeping the most
/// recent [`WEEK_COUNT`] weeks in ascending order.
pub fn weekly_averages(entries: &[WeightEntry]) -> WeeklyComparison {
    let mut buckets: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for entry in entries {
        let bucket = buckets.entry(iso_week(entry.date)).or_default();
        bucket.0 += entry.weight;
        bucket.1 += 1;
    }

    let skip = buckets.len().saturating_sub(WEEK_COUNT);
    let weeks: Vec<WeeklyAverage> = buckets
        .into_iter()
        .skip(skip)
        .map(|((year, week), (total, count))| {
            let mean_kg = total / count as f64;
            WeeklyAverage {
                year,
                week,
                label: week_label(year, week),
                entries: count,
                average_weight_kg: round1(mean_kg),
                mean_kg,
            }
        })
        .collect();

    if weeks.len() < 2 {
        WeeklyComparison::InsufficientData
    } else {
        WeeklyComparison::Weeks(weeks)
    }
}

#[derive(Debug, Serialize)]
pub struct WeeklyPoint {
    pub year: i32,
    pub week: u32,
    pub label: String,
    pub entries: usize,
    pub average_weight: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeeklyView {
    InsufficientData,
    Ok { unit: Unit, weeks: Vec<WeeklyPoint> },
}

impl WeeklyComparison {
    pub fn view(&self, unit: Unit) -> WeeklyView {
        match self {
            WeeklyComparison::InsufficientData => WeeklyView::InsufficientData,
            WeeklyComparison::Weeks(weeks) => WeeklyView::Ok {
                unit,
                weeks: weeks
                    .iter()
                    .map(|w| WeeklyPoint {
                        year: w.year,
                        week: w.week,
                        label: w.label.clone(),
                        entries: w.entries,
                        average_weight: w.average_in(unit),
                    })
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn entry(date: NaiveDate, weight: f64) -> WeightEntry {
        WeightEntry {
            id: date.to_string(),
            date,
            weight,
            notes: None,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_week_is_insufficient() {
        let entries = [entry(ymd(2024, 1, 1), 80.0), entry(ymd(2024, 1, 3), 82.0)];
        assert_eq!(weekly_averages(&entries), WeeklyComparison::InsufficientData);
        assert_eq!(weekly_averages(&[]), WeeklyComparison::InsufficientData);
    }

    #[test]
    fn same_week_entries_are_averaged() {
        let entries = [
            entry(ymd(2024, 1, 1), 80.0),
            entry(ymd(2024, 1, 3), 82.0),
            entry(ymd(2024, 1, 9), 79.04),
        ];
        let WeeklyComparison::Weeks(weeks) = weekly_averages(&entries) else {
            panic!("expected two weeks");
        };

        assert_eq!(weeks.len(), 2);
        assert_eq!((weeks[0].year, weeks[0].week), (2024, 1));
        assert_eq!(weeks[0].entries, 2);
        assert_eq!(weeks[0].average_weight_kg, 81.0);
        assert_eq!(weeks[1].label, "2024-W02");
        assert_eq!(weeks[1].average_weight_kg, 79.0);
    }

    #[test]
    fn year_boundary_uses_iso_year() {
        let entries = [entry(ymd(2024, 12, 30), 70.0), entry(ymd(2024, 12, 20), 71.0)];
        let WeeklyComparison::Weeks(weeks) = weekly_averages(&entries) else {
            panic!("expected two weeks");
        };
        assert_eq!(weeks[0].label, "2024-W51");
        assert_eq!(weeks[1].label, "2025-W01");
    }

    #[test]
    fn keeps_most_recent_eight_weeks_ascending() {
        let start = ymd(2024, 1, 1);
        let entries: Vec<_> = (0..12)
            .rev()
            .map(|i| entry(start + Duration::weeks(i), 90.0 - i as f64))
            .collect();

        let WeeklyComparison::Weeks(weeks) = weekly_averages(&entries) else {
            panic!("expected weeks");
        };

        assert_eq!(weeks.len(), WEEK_COUNT);
        assert_eq!(weeks.first().unwrap().week, 5);
        assert_eq!(weeks.last().unwrap().week, 12);
        assert!(weeks.windows(2).all(|w| w[0].week < w[1].week));
    }

    #[test]
    fn view_converts_from_unrounded_mean() {
        let entries = [entry(ymd(2024, 1, 1), 80.04), entry(ymd(2024, 1, 8), 80.0)];
        let WeeklyView::Ok { weeks, .. } = weekly_averages(&entries).view(Unit::Lbs) else {
            panic!("expected weeks");
        };
        // 80.04 kg = 176.457... lbs; converting the rounded 80.0 would give 176.4.
        assert_eq!(weeks[0].average_weight, 176.5);
        assert_eq!(weeks[1].average_weight, 176.4);
    }
}
