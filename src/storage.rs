use crate::errors::AppError;
use crate::models::WeightEntry;
use crate::store::EntryStore;
use crate::streak::Streak;
use crate::tracker::{Settings, Tracker};
use crate::units::Unit;
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

/// Independently persisted values, one JSON file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Entries,
    Unit,
    Goal,
    Height,
    Streak,
    LastLog,
}

impl Cell {
    pub const ALL: [Cell; 6] = [
        Cell::Entries,
        Cell::Unit,
        Cell::Goal,
        Cell::Height,
        Cell::Streak,
        Cell::LastLog,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Cell::Entries => "entries.json",
            Cell::Unit => "unit.json",
            Cell::Goal => "goal.json",
            Cell::Height => "height.json",
            Cell::Streak => "streak.json",
            Cell::LastLog => "last_log.json",
        }
    }
}

/// Reads one cell, falling back to `T::default()` when the file is absent
/// or does not parse.
pub async fn load_cell<T>(dir: &Path, cell: Cell) -> T
where
    T: DeserializeOwned + Default,
{
    let path = dir.join(cell.file_name());
    match fs::read(&path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            T::default()
        }
    }
}

pub async fn persist_cell<T>(dir: &Path, cell: Cell, value: &T) -> Result<(), AppError>
where
    T: Serialize + ?Sized,
{
    write_staged(dir, vec![(cell, encode(value)?)]).await
}

fn encode<T>(value: &T) -> Result<Vec<u8>, AppError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec_pretty(value).map_err(AppError::internal)
}

/// Writes every payload to a `.tmp` sibling first and only renames them over
/// the live cells once all of them are on disk. A failed write leaves every
/// live cell untouched.
async fn write_staged(dir: &Path, payloads: Vec<(Cell, Vec<u8>)>) -> Result<(), AppError> {
    fs::create_dir_all(dir).await?;

    let mut staged: Vec<(Cell, PathBuf)> = Vec::with_capacity(payloads.len());
    for (cell, payload) in payloads {
        let tmp = dir.join(format!("{}.tmp", cell.file_name()));
        if let Err(err) = fs::write(&tmp, payload).await {
            error!("failed to stage {}: {err}", tmp.display());
            for (_, path) in &staged {
                let _ = fs::remove_file(path).await;
            }
            return Err(err.into());
        }
        staged.push((cell, tmp));
    }

    for (cell, tmp) in &staged {
        fs::rename(tmp, dir.join(cell.file_name())).await?;
        debug!(cell = cell.file_name(), "persisted");
    }
    Ok(())
}

pub async fn load_tracker(dir: &Path) -> Tracker {
    let entries: Vec<WeightEntry> = load_cell(dir, Cell::Entries).await;
    let unit: Unit = load_cell(dir, Cell::Unit).await;
    let goal_weight_kg: Option<f64> = load_cell(dir, Cell::Goal).await;
    let height_m: Option<f64> = load_cell(dir, Cell::Height).await;
    let streak: u32 = load_cell(dir, Cell::Streak).await;
    let last_log_date: Option<NaiveDate> = load_cell(dir, Cell::LastLog).await;

    Tracker::new(
        EntryStore::new(entries),
        Settings {
            unit,
            goal_weight_kg,
            height_m,
            streak: Streak::new(streak, last_log_date),
        },
    )
}

/// Writes the given cells of `tracker` back in full, all or nothing.
pub async fn persist_cells(dir: &Path, tracker: &Tracker, cells: &[Cell]) -> Result<(), AppError> {
    let settings = &tracker.settings;
    let mut payloads = Vec::with_capacity(cells.len());
    for &cell in cells {
        let payload = match cell {
            Cell::Entries => encode(tracker.store.entries())?,
            Cell::Unit => encode(&settings.unit)?,
            Cell::Goal => encode(&settings.goal_weight_kg)?,
            Cell::Height => encode(&settings.height_m)?,
            Cell::Streak => encode(&settings.streak.count)?,
            Cell::LastLog => encode(&settings.streak.last_log_date)?,
        };
        payloads.push((cell, payload));
    }
    write_staged(dir, payloads).await
}
