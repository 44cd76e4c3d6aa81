use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/toggle/:activity", post(handlers::toggle_form))
        .route("/api/activities", get(handlers::get_activities))
        .route("/api/today", get(handlers::get_day))
        .route("/api/toggle", post(handlers::toggle_activity))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/api/tasks/summary", get(handlers::task_summary))
        .route("/api/tasks/:id/status", post(handlers::update_task_status))
        .route("/api/tasks/:id/toggle", post(handlers::toggle_task))
        .route("/api/settings", get(handlers::get_settings).put(handlers::update_settings))
        .route("/api/export", get(handlers::export_data))
        .with_state(state)
}
