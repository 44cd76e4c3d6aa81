use crate::activities::ActivityId;
use crate::calendar::{DateRange, date_key};
use crate::daylog::DayLog;
use crate::settings::Settings;
use crate::tasks::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything persisted on this device.
///
/// `local_storage` holds the `daily-log-YYYY-MM-DD` entries, each value a JSON
/// array of activity ids.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub local_storage: BTreeMap<String, String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub count: usize,
    pub percent: u32,
    pub is_fully_complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub activity: String,
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayResponse {
    pub date: String,
    pub activities: Vec<ActivityId>,
    pub completed_at: BTreeMap<ActivityId, DateTime<Utc>>,
    pub total: usize,
    pub completion: Completion,
    pub is_today: bool,
}

impl DayResponse {
    pub fn new(log: DayLog, completion: Completion, total: usize, is_today: bool) -> Self {
        Self {
            date: date_key(log.date),
            activities: log.completed_activities.into_iter().collect(),
            completed_at: log.completed_at,
            total,
            completion,
            is_today,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardDay {
    pub date: String,
    pub activities: Vec<ActivityId>,
    pub completion: Completion,
    pub is_today: bool,
}

/// One grid row: whether the activity was done on each day of the range.
#[derive(Debug, Serialize)]
pub struct ActivityRow {
    pub id: ActivityId,
    pub label: String,
    pub checked: Vec<bool>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub range: DateRange,
    pub day_count: usize,
    pub total_activities: usize,
    pub streak: u32,
    pub done_today: Option<usize>,
    pub days: Vec<DashboardDay>,
    pub rows: Vec<ActivityRow>,
}
