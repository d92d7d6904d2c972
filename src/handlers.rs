use crate::dates::{date_key, parse_date, today};
use crate::errors::{AppError, TrackerError};
use crate::export::export_file_name;
use crate::models::{
    EntryInput, EntryRequest, EntryView, GoalRequest, HeightRequest, SaveResponse,
    SettingsResponse, TipResponse, UnitRequest,
};
use crate::stats::{ProgressSeries, SummaryView};
use crate::state::AppState;
use crate::storage::{Cell, persist_cells};
use crate::tracker::Tracker;
use crate::ui::render_index;
use crate::units::{m_to_cm, m_to_ft_in, round1};
use crate::weekly::WeeklyView;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::header,
    response::{Html, IntoResponse},
};
use serde::Serialize;
use tokio::sync::MutexGuard;
use tracing::{info, warn};

const ENTRY_CELLS: [Cell; 3] = [Cell::Entries, Cell::Streak, Cell::LastLog];

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryResponse {
    NoData,
    Ok(SummaryView),
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = refresh_session(&state).await;
    Html(render_index(&tracker))
}

pub async fn list_entries(State(state): State<AppState>) -> Json<Vec<EntryView>> {
    let tracker = refresh_session(&state).await;
    let views = tracker
        .sorted_entries()
        .iter()
        .map(|entry| tracker.entry_view(entry))
        .collect();
    Json(views)
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntryView>, AppError> {
    let tracker = refresh_session(&state).await;
    let entry = tracker
        .store
        .get(&id)
        .ok_or_else(|| TrackerError::NotFound(id.clone()))?;
    Ok(Json(tracker.entry_view(entry)))
}

pub async fn add_entry(
    State(state): State<AppState>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let Json(payload) = payload?;
    save_entry(&state, payload, None).await.map(Json)
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let Json(payload) = payload?;
    save_entry(&state, payload, Some(&id)).await.map(Json)
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (_, removed) = commit(&state, &[Cell::Entries], |tracker| tracker.delete_entry(&id)).await?;

    info!(id = %removed.id, date = %removed.date, "deleted entry");
    Ok(Json(serde_json::json!({
        "deleted": removed.id,
        "date": date_key(removed.date),
    })))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let tracker = refresh_session(&state).await;
    let response = match tracker.summary() {
        Some(summary) => SummaryResponse::Ok(
            summary.view(tracker.settings.unit, tracker.settings.goal_weight_kg),
        ),
        None => SummaryResponse::NoData,
    };
    Json(response)
}

pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressSeries> {
    let tracker = refresh_session(&state).await;
    Json(tracker.progress())
}

pub async fn get_weekly(State(state): State<AppState>) -> Json<WeeklyView> {
    let tracker = refresh_session(&state).await;
    Json(tracker.weekly().view(tracker.settings.unit))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let tracker = refresh_session(&state).await;
    Json(settings_response(&tracker))
}

pub async fn set_unit(
    State(state): State<AppState>,
    payload: Result<Json<UnitRequest>, JsonRejection>,
) -> Result<Json<SettingsResponse>, AppError> {
    let Json(payload) = payload?;
    let (tracker, ()) = commit(&state, &[Cell::Unit], |tracker| {
        tracker.set_unit(payload.unit);
        Ok(())
    })
    .await?;
    Ok(Json(settings_response(&tracker)))
}

pub async fn set_goal(
    State(state): State<AppState>,
    payload: Result<Json<GoalRequest>, JsonRejection>,
) -> Result<Json<SettingsResponse>, AppError> {
    let Json(payload) = payload?;
    let (tracker, ()) = commit(&state, &[Cell::Goal], |tracker| tracker.set_goal(payload.goal)).await?;
    Ok(Json(settings_response(&tracker)))
}

pub async fn set_height(
    State(state): State<AppState>,
    payload: Result<Json<HeightRequest>, JsonRejection>,
) -> Result<Json<SettingsResponse>, AppError> {
    let Json(payload) = payload?;
    let (tracker, ()) =
        commit(&state, &[Cell::Height], |tracker| tracker.set_height(payload.height)).await?;
    Ok(Json(settings_response(&tracker)))
}

pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    let csv = refresh_session(&state).await.export_csv();
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(today()));
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
}

pub async fn get_tip(State(state): State<AppState>) -> Json<TipResponse> {
    let sequence = state.tip_board.begin();
    let tip = state.tips.fetch_tip().await;
    let accepted = state.tip_board.complete(sequence, tip.clone()).await;
    Json(TipResponse {
        tip,
        sequence,
        stale: !accepted,
    })
}

pub async fn current_tip(State(state): State<AppState>) -> Result<Json<TipResponse>, AppError> {
    let (sequence, tip) = state
        .tip_board
        .current()
        .await
        .ok_or_else(|| AppError::not_found("no tip fetched yet"))?;
    Ok(Json(TipResponse {
        tip,
        sequence,
        stale: false,
    }))
}

async fn save_entry(
    state: &AppState,
    payload: EntryRequest,
    id: Option<&str>,
) -> Result<SaveResponse, AppError> {
    let today = today();
    let date = match payload.date.as_deref() {
        Some(value) if !value.trim().is_empty() => parse_date(value)?,
        _ => today,
    };
    let input = EntryInput::new(date, payload.weight, payload.notes);

    let (tracker, outcome) =
        commit(state, &ENTRY_CELLS, |tracker| tracker.save_entry(input, id, today)).await?;

    info!(
        id = %outcome.entry.id,
        date = %outcome.entry.date,
        outcome = outcome.kind.as_str(),
        "saved entry"
    );
    Ok(SaveResponse {
        outcome: outcome.kind.as_str().to_string(),
        entry: tracker.entry_view(&outcome.entry),
        streak: tracker.settings.streak.count,
    })
}

/// Locks the tracker and runs the session-start step for today, so a process
/// left running across days still resets a lapsed streak on the next load.
async fn refresh_session(state: &AppState) -> MutexGuard<'_, Tracker> {
    let mut tracker = state.tracker.lock().await;
    if tracker.start_session(today()) {
        if let Err(err) = persist_cells(&state.data_dir, &tracker, &[Cell::Streak]).await {
            warn!("failed to persist reset streak: {}", err.message);
        }
    }
    tracker
}

/// Applies `mutate` to a copy of the tracker and swaps it in only once every
/// touched cell is on disk. Any failure leaves the shared state as it was.
async fn commit<'a, T>(
    state: &'a AppState,
    cells: &[Cell],
    mutate: impl FnOnce(&mut Tracker) -> Result<T, TrackerError>,
) -> Result<(MutexGuard<'a, Tracker>, T), AppError> {
    let mut tracker = refresh_session(state).await;
    let mut next = tracker.clone();
    let value = mutate(&mut next)?;
    persist_cells(&state.data_dir, &next, cells).await?;
    *tracker = next;
    Ok((tracker, value))
}

fn settings_response(tracker: &Tracker) -> SettingsResponse {
    let settings = &tracker.settings;
    SettingsResponse {
        unit: settings.unit,
        goal: settings
            .goal_weight_kg
            .map(|kg| round1(settings.unit.from_kg(kg))),
        goal_weight_kg: settings.goal_weight_kg,
        height_m: settings.height_m,
        height_cm: settings.height_m.map(|m| m_to_cm(m).round()),
        height_ft_in: settings.height_m.map(m_to_ft_in),
        streak: settings.streak.count,
        last_log_date: settings.streak.last_log_date.map(date_key),
    }
}
