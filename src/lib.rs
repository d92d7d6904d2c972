pub mod app;
pub mod bmi;
pub mod config;
pub mod dates;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;
pub mod tips;
pub mod tracker;
pub mod ui;
pub mod units;
pub mod weekly;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_tracker;
pub use tracker::Tracker;
