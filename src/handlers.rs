use crate::activities::{ActivityDefinition, ActivityId};
use crate::calendar::{DateRange, parse_iso, today};
use crate::daylog::{DayLog, LogCollection, toggle};
use crate::errors::AppError;
use crate::models::{
    AppData, DashboardResponse, DateQuery, DayResponse, RangeQuery, ToggleRequest,
};
use crate::settings::{Settings, SettingsPatch};
use crate::state::AppState;
use crate::stats::{build_dashboard_at, compute_completion};
use crate::storage::{SaveOutcome, persist_data};
use crate::tasks::{self, NewTask, StatusUpdate, Task, TaskQuery, TaskSummary};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

const DASHBOARD_DAYS: u32 = 14;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let date = today();
    let log = load_day(&state, date).await;
    let completion = compute_completion(&log, state.activities.len());
    Html(render_index(&state.activities, &log, &completion))
}

pub async fn get_activities(State(state): State<AppState>) -> Json<Vec<ActivityDefinition>> {
    Json(state.activities.iter().cloned().collect())
}

pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DayResponse>, AppError> {
    let date = resolve_day(&state, query.date.as_deref(), today())?;
    let log = load_day(&state, date).await;
    Ok(Json(day_response(&state, log)))
}

pub async fn toggle_activity(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<DayResponse>, AppError> {
    let date = resolve_day(&state, payload.date.as_deref(), today())?;
    let log = apply_toggle(&state, payload.activity.trim(), date).await?;
    Ok(Json(day_response(&state, log)))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path(activity): Path<String>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, &activity, today()).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let today = today();
    let range = resolve_range(&query, state.launch_date, today)?;

    let logs = match state.logs.load_range(range).await {
        Ok(logs) => logs,
        Err(err) => {
            warn!(mode = state.logs.mode(), "failed to load day logs for range: {err}");
            LogCollection::new()
        }
    };

    Ok(Json(build_dashboard_at(today, range, &logs, &state.activities)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Json<Vec<Task>> {
    let data = state.data.lock().await;
    Json(tasks::list(&data.tasks, query.status))
}

pub async fn task_summary(State(state): State<AppState>) -> Json<TaskSummary> {
    let data = state.data.lock().await;
    Json(tasks::summary(&data.tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let task = tasks::add(&mut next.tasks, payload, today())?;
    commit(&state, &mut data, next).await?;
    info!(id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<Task>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let task = tasks::set_status(&mut next.tasks, &id, payload.status)?;
    commit(&state, &mut data, next).await?;
    Ok(Json(task))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let task = tasks::toggle_done(&mut next.tasks, &id)?;
    commit(&state, &mut data, next).await?;
    Ok(Json(task))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    let data = state.data.lock().await;
    Json(data.settings.clone())
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.settings.apply(patch)?;
    commit(&state, &mut data, next).await?;
    Ok(Json(data.settings.clone()))
}

pub async fn export_data(State(state): State<AppState>) -> Json<AppData> {
    let data = state.data.lock().await;
    Json(data.clone())
}

async fn apply_toggle(state: &AppState, activity: &str, date: NaiveDate) -> Result<DayLog, AppError> {
    let Some(definition) = state.activities.get(activity) else {
        return Err(AppError::bad_request(format!("unknown activity '{activity}'")));
    };
    let id: ActivityId = definition.id.clone();

    let current = load_day(state, date).await;
    let next = toggle(&id, &current, Utc::now());

    match state.logs.save(&next).await? {
        SaveOutcome::Saved => info!(%date, activity = %id, done = next.is_done(&id), "day log updated"),
        SaveOutcome::Skipped => info!(%date, activity = %id, "not signed in, change kept in memory only"),
    }
    Ok(next)
}

/// Writes `next` to disk and only then replaces the in-memory document.
async fn commit(state: &AppState, data: &mut AppData, next: AppData) -> Result<(), AppError> {
    persist_data(&state.data_path, &next).await?;
    *data = next;
    Ok(())
}

/// Reads a day, treating any store failure as an empty day.
async fn load_day(state: &AppState, date: NaiveDate) -> DayLog {
    match state.logs.load_one(date).await {
        Ok(log) => log,
        Err(err) => {
            warn!(mode = state.logs.mode(), %date, "failed to load day log: {err}");
            DayLog::empty(date)
        }
    }
}

fn day_response(state: &AppState, log: DayLog) -> DayResponse {
    let total = state.activities.len();
    let completion = compute_completion(&log, total);
    let is_today = log.date == today();
    DayResponse::new(log, completion, total, is_today)
}

fn resolve_day(state: &AppState, raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let date = match raw {
        Some(value) => parse_iso(value).map_err(|err| AppError::bad_request(err.to_string()))?,
        None => return Ok(today),
    };
    if date > today {
        return Err(AppError::bad_request(format!("{date} is in the future")));
    }
    if date < state.launch_date {
        return Err(AppError::bad_request(format!(
            "{date} is before the launch date {}",
            state.launch_date
        )));
    }
    Ok(date)
}

/// Dashboard range: `launch <= start <= end <= today`, defaulting to the last
/// fourteen days clipped at `launch`.
fn resolve_range(
    query: &RangeQuery,
    launch: NaiveDate,
    today: NaiveDate,
) -> Result<DateRange, AppError> {
    let parse = |value: &str| parse_iso(value).map_err(|err| AppError::bad_request(err.to_string()));

    let end = match query.end.as_deref() {
        Some(value) => parse(value)?,
        None => today,
    };
    if end > today {
        return Err(AppError::bad_request(format!("range end {end} is in the future")));
    }
    if end < launch {
        return Err(AppError::bad_request(format!(
            "range end {end} is before the launch date {launch}"
        )));
    }

    let start = match query.start.as_deref() {
        Some(value) => parse(value)?,
        None => DateRange::ending_at(end, DASHBOARD_DAYS).start().max(launch),
    };
    if start < launch {
        return Err(AppError::bad_request(format!(
            "range start {start} is before the launch date {launch}"
        )));
    }
    DateRange::new(start, end).map_err(|err| AppError::bad_request(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: Option<&str>, end: Option<&str>) -> RangeQuery {
        RangeQuery {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn launch() -> NaiveDate {
        date(2, 22)
    }

    fn unwritable_state(dir: &tempfile::TempDir) -> AppState {
        use crate::activities::ActivityRegistry;
        use crate::storage::LocalLogStore;
        use std::sync::Arc;
        use tokio::sync::Mutex;

        let data_path = dir.path().join("missing-dir").join("state.json");
        let data = Arc::new(Mutex::new(AppData::default()));
        let logs = Arc::new(LocalLogStore::new(data_path.clone(), Arc::clone(&data)));
        AppState::new(data_path, data, logs, ActivityRegistry::default(), launch())
    }

    #[test]
    fn default_range_is_last_fourteen_days() {
        let range = resolve_range(&query(None, None), launch(), date(3, 10)).unwrap();
        assert_eq!(range.start(), date(2, 25));
        assert_eq!(range.end(), date(3, 10));
    }

    #[test]
    fn future_end_is_rejected() {
        let err = resolve_range(&query(None, Some("2026-03-11")), launch(), date(3, 10)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn start_after_end_is_rejected() {
        let err = resolve_range(&query(Some("2026-03-05"), Some("2026-03-01")), launch(), date(3, 10))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(
            resolve_range(&query(Some("2026-03-01"), Some("2026-03-01")), launch(), date(3, 10))
                .is_ok()
        );
    }

    #[test]
    fn start_before_launch_is_rejected() {
        let err = resolve_range(&query(Some("0001-01-01"), None), launch(), date(3, 10)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("launch date"));

        let err = resolve_range(&query(None, Some("2026-02-21")), launch(), date(3, 10)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(resolve_range(&query(Some("2026-02-22"), None), launch(), date(3, 10)).is_ok());
    }

    #[test]
    fn default_range_is_clipped_at_launch() {
        let range = resolve_range(&query(None, None), launch(), date(2, 25)).unwrap();
        assert_eq!(range.start(), launch());
        assert_eq!(range.days().len(), 4);
    }

    #[tokio::test]
    async fn failed_persist_keeps_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let state = unwritable_state(&dir);

        let patch: SettingsPatch =
            serde_json::from_value(serde_json::json!({ "dark_mode": true })).unwrap();
        let err = update_settings(State(state.clone()), Json(patch)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let task: NewTask =
            serde_json::from_value(serde_json::json!({ "title": "Ship it" })).unwrap();
        assert!(create_task(State(state.clone()), Json(task)).await.is_err());

        let data = state.data.lock().await;
        assert!(!data.settings.dark_mode);
        assert!(data.tasks.is_empty());
    }
}
