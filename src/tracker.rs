use crate::dates::{date_key, short_label};
use crate::errors::TrackerError;
use crate::export::entries_to_csv;
use crate::models::{EntryInput, EntryView, HeightInput, WeightEntry, validate_positive};
use crate::stats::{ProgressSeries, Summary, progress_series, summarize};
use crate::store::{EntryStore, SaveOutcome};
use crate::streak::Streak;
use crate::units::{Unit, cm_to_m, ft_in_to_m, round1};
use crate::weekly::{WeeklyComparison, weekly_averages};
use chrono::NaiveDate;
use tracing::info;

/// Scalar settings. Each field is persisted in its own cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub unit: Unit,
    pub goal_weight_kg: Option<f64>,
    pub height_m: Option<f64>,
    pub streak: Streak,
}

/// Application state: the entry store plus settings.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    pub store: EntryStore,
    pub settings: Settings,
}

impl Tracker {
    pub fn new(store: EntryStore, settings: Settings) -> Self {
        Self { store, settings }
    }

    /// Runs once after loading. Returns whether the streak decayed.
    pub fn start_session(&mut self, today: NaiveDate) -> bool {
        let decayed = self.settings.streak.decay(today);
        if decayed {
            info!("streak reset after missed days");
        }
        decayed
    }

    /// Saves an entry typed in the current display unit. Adds (with or
    /// without a same-day merge) count towards the streak; edits do not.
    pub fn save_entry(
        &mut self,
        input: EntryInput,
        id: Option<&str>,
        today: NaiveDate,
    ) -> Result<SaveOutcome, TrackerError> {
        let outcome = self.store.save(input, self.settings.unit, id)?;
        if outcome.kind.is_new_log() {
            self.settings.streak.record_log(outcome.entry.date, today);
        }
        Ok(outcome)
    }

    pub fn delete_entry(&mut self, id: &str) -> Result<WeightEntry, TrackerError> {
        self.store.delete(id)
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.settings.unit = unit;
    }

    /// `goal` is in the display unit; `None` clears it.
    pub fn set_goal(&mut self, goal: Option<f64>) -> Result<(), TrackerError> {
        self.settings.goal_weight_kg = match goal {
            Some(value) => Some(self.settings.unit.to_kg(validate_positive(value, "goal")?)),
            None => None,
        };
        Ok(())
    }

    pub fn set_height(&mut self, height: Option<HeightInput>) -> Result<(), TrackerError> {
        self.settings.height_m = match height {
            Some(input) => Some(height_to_m(input)?),
            None => None,
        };
        Ok(())
    }

    pub fn sorted_entries(&self) -> Vec<WeightEntry> {
        self.store.sorted_by_date_descending()
    }

    pub fn summary(&self) -> Option<Summary> {
        summarize(&self.sorted_entries(), &self.settings)
    }

    pub fn progress(&self) -> ProgressSeries {
        progress_series(
            self.store.entries(),
            self.settings.unit,
            self.settings.goal_weight_kg,
        )
    }

    pub fn weekly(&self) -> WeeklyComparison {
        weekly_averages(self.store.entries())
    }

    pub fn export_csv(&self) -> String {
        entries_to_csv(&self.sorted_entries(), self.settings.unit)
    }

    pub fn entry_view(&self, entry: &WeightEntry) -> EntryView {
        let unit = self.settings.unit;
        EntryView {
            id: entry.id.clone(),
            date: date_key(entry.date),
            label: short_label(entry.date),
            weight: round1(unit.from_kg(entry.weight)),
            unit,
            notes: entry.notes.clone(),
        }
    }
}

fn height_to_m(input: HeightInput) -> Result<f64, TrackerError> {
    match input {
        HeightInput::Cm { value } => Ok(cm_to_m(validate_positive(value, "height")?)),
        HeightInput::Ft { feet, inches } => {
            let valid = feet.is_finite() && inches.is_finite() && feet >= 0.0 && inches >= 0.0;
            if !valid || (feet == 0.0 && inches == 0.0) {
                return Err(TrackerError::Validation(
                    "height must be a positive number of feet and inches".into(),
                ));
            }
            Ok(ft_in_to_m(feet, inches))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SaveKind;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn input(date: NaiveDate, weight: f64) -> EntryInput {
        EntryInput::new(date, weight, None)
    }

    #[test]
    fn adding_today_starts_streak() {
        let mut tracker = Tracker::default();
        tracker.save_entry(input(today(), 70.0), None, today()).unwrap();
        assert_eq!(tracker.settings.streak, Streak::new(1, Some(today())));
    }

    #[test]
    fn merged_add_for_today_still_counts() {
        let yesterday = today() - Duration::days(1);
        let mut tracker = Tracker::default();
        tracker.save_entry(input(today(), 70.0), None, today()).unwrap();
        tracker.settings.streak = Streak::new(4, Some(yesterday));

        let outcome = tracker.save_entry(input(today(), 69.0), None, today()).unwrap();

        assert_eq!(outcome.kind, SaveKind::Merged);
        assert_eq!(tracker.settings.streak, Streak::new(5, Some(today())));
    }

    #[test]
    fn edits_and_backdated_adds_leave_streak_alone() {
        let mut tracker = Tracker::default();
        let saved = tracker
            .save_entry(input(today() - Duration::days(2), 70.0), None, today())
            .unwrap();
        assert_eq!(tracker.settings.streak, Streak::default());

        tracker
            .save_entry(input(today(), 71.0), Some(&saved.entry.id), today())
            .unwrap();
        assert_eq!(tracker.settings.streak, Streak::default());
    }

    #[test]
    fn rejected_save_changes_nothing() {
        let mut tracker = Tracker::default();
        assert!(tracker.save_entry(input(today(), -1.0), None, today()).is_err());
        assert!(tracker.store.is_empty());
        assert_eq!(tracker.settings.streak, Streak::default());
    }

    #[test]
    fn start_session_decays_stale_streak() {
        let mut tracker = Tracker::default();
        tracker.settings.streak = Streak::new(6, Some(today() - Duration::days(5)));
        assert!(tracker.start_session(today()));
        assert_eq!(tracker.settings.streak.count, 0);
    }

    #[test]
    fn later_sessions_in_the_same_process_decay_streak() {
        let mut tracker = Tracker::default();
        tracker.save_entry(input(today(), 70.0), None, today()).unwrap();
        assert!(!tracker.start_session(today()));

        let next_day = today() + Duration::days(1);
        assert!(!tracker.start_session(next_day));
        assert_eq!(tracker.settings.streak.count, 1);

        let week_later = today() + Duration::days(7);
        assert!(tracker.start_session(week_later));
        assert_eq!(tracker.settings.streak, Streak::new(0, Some(today())));
        assert!(!tracker.start_session(week_later));
    }

    #[test]
    fn goal_is_stored_in_kg() {
        let mut tracker = Tracker::default();
        tracker.set_unit(Unit::Lbs);
        tracker.set_goal(Some(150.0)).unwrap();
        let goal = tracker.settings.goal_weight_kg.unwrap();
        assert!((goal - 150.0 * crate::units::LBS_TO_KG).abs() < 1e-9);

        assert!(tracker.set_goal(Some(0.0)).is_err());
        assert_eq!(tracker.settings.goal_weight_kg, Some(goal));

        tracker.set_goal(None).unwrap();
        assert_eq!(tracker.settings.goal_weight_kg, None);
    }

    #[test]
    fn height_accepts_cm_and_feet_inches() {
        let mut tracker = Tracker::default();
        tracker.set_height(Some(HeightInput::Cm { value: 180.0 })).unwrap();
        assert_eq!(tracker.settings.height_m, Some(1.8));

        tracker
            .set_height(Some(HeightInput::Ft { feet: 6.0, inches: 0.0 }))
            .unwrap();
        let m = tracker.settings.height_m.unwrap();
        assert!((m - 1.8288).abs() < 1e-3);

        let err = tracker.set_height(Some(HeightInput::Ft { feet: 0.0, inches: 0.0 }));
        assert!(matches!(err, Err(TrackerError::Validation(_))));
        assert!(tracker.set_height(Some(HeightInput::Cm { value: -5.0 })).is_err());
        assert_eq!(tracker.settings.height_m, Some(m));

        tracker.set_height(None).unwrap();
        assert_eq!(tracker.settings.height_m, None);
    }

    #[test]
    fn entry_view_uses_display_unit() {
        let mut tracker = Tracker::default();
        let saved = tracker.save_entry(input(today(), 80.0), None, today()).unwrap();
        tracker.set_unit(Unit::Lbs);

        let view = tracker.entry_view(&saved.entry);
        assert_eq!(view.weight, 176.4);
        assert_eq!(view.unit, Unit::Lbs);
        assert_eq!(view.label, "May 10");
    }
}
