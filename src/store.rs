use crate::errors::TrackerError;
use crate::models::{EntryInput, WeightEntry, validate_positive};
use crate::units::Unit;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    /// New entry appended with a fresh id.
    Created,
    /// New entry folded into the existing entry for the same date.
    Merged,
    /// Existing entry edited by id.
    Updated,
}

impl SaveKind {
    pub fn is_new_log(self) -> bool {
        matches!(self, SaveKind::Created | SaveKind::Merged)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SaveKind::Created => "created",
            SaveKind::Merged => "merged",
            SaveKind::Updated => "updated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub kind: SaveKind,
    pub entry: WeightEntry,
}

/// Owner of the entry collection. Weights are held in kilograms only.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<WeightEntry>,
}

impl EntryStore {
    pub fn new(entries: Vec<WeightEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WeightEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Saves `input` (weight in `unit`).
    ///
    /// With an `id` the matching entry is overwritten in place, even when its
    /// new date collides with another entry. Without one, an entry already
    /// recorded for the same date is overwritten instead of duplicated.
    pub fn save(
        &mut self,
        input: EntryInput,
        unit: Unit,
        id: Option<&str>,
    ) -> Result<SaveOutcome, TrackerError> {
        let weight = validate_positive(input.weight, "weight")?;
        let weight_kg = unit.to_kg(weight);

        let (index, kind) = match id {
            Some(id) => {
                let index = self
                    .position(id)
                    .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
                (index, SaveKind::Updated)
            }
            None => {
                let same_day = self.entries.iter().position(|e| e.date == input.date);
                let Some(index) = same_day else {
                    let entry = WeightEntry {
                        id: Uuid::new_v4().to_string(),
                        date: input.date,
                        weight: weight_kg,
                        notes: input.notes,
                    };
                    self.entries.push(entry.clone());
                    return Ok(SaveOutcome {
                        kind: SaveKind::Created,
                        entry,
                    });
                };
                (index, SaveKind::Merged)
            }
        };

        let entry = &mut self.entries[index];
        entry.date = input.date;
        entry.weight = weight_kg;
        entry.notes = input.notes;

        Ok(SaveOutcome {
            kind,
            entry: entry.clone(),
        })
    }

    pub fn delete(&mut self, id: &str) -> Result<WeightEntry, TrackerError> {
        let index = self
            .position(id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        Ok(self.entries.remove(index))
    }

    /// Most recent first; entries sharing a date keep their relative order.
    pub fn sorted_by_date_descending(&self) -> Vec<WeightEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}
