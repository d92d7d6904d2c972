use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/entries",
            get(handlers::list_entries).post(handlers::add_entry),
        )
        .route(
            "/api/entries/:id",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/weekly", get(handlers::get_weekly))
        .route("/api/settings", get(handlers::get_settings))
        .route("/api/settings/unit", put(handlers::set_unit))
        .route("/api/settings/goal", put(handlers::set_goal))
        .route("/api/settings/height", put(handlers::set_height))
        .route("/api/export.csv", get(handlers::export_csv))
        .route("/api/tip", get(handlers::get_tip))
        .route("/api/tip/current", get(handlers::current_tip))
        .with_state(state)
}
