use crate::tips::{TipBoard, TipClient};
use crate::tracker::Tracker;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub tracker: Arc<Mutex<Tracker>>,
    pub tips: Arc<TipClient>,
    pub tip_board: Arc<TipBoard>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, tracker: Tracker, tips: TipClient) -> Self {
        Self {
            data_dir,
            tracker: Arc::new(Mutex::new(tracker)),
            tips: Arc::new(tips),
            tip_board: Arc::new(TipBoard::default()),
        }
    }
}
