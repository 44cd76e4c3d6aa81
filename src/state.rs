use crate::activities::ActivityRegistry;
use crate::models::AppData;
use crate::storage::LogStore;
use chrono::NaiveDate;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub logs: Arc<dyn LogStore>,
    pub activities: Arc<ActivityRegistry>,
    pub launch_date: NaiveDate,
}

impl AppState {
    pub fn new(
        data_path: PathBuf,
        data: Arc<Mutex<AppData>>,
        logs: Arc<dyn LogStore>,
        activities: ActivityRegistry,
        launch_date: NaiveDate,
    ) -> Self {
        Self {
            data_path,
            data,
            logs,
            activities: Arc::new(activities),
            launch_date,
        }
    }
}
