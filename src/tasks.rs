use crate::errors::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TaskSummary {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

pub fn list(tasks: &[Task], status: Option<TaskStatus>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| status.is_none_or(|status| task.status == status))
        .cloned()
        .collect()
}

pub fn summary(tasks: &[Task]) -> TaskSummary {
    tasks.iter().fold(
        TaskSummary {
            total: tasks.len(),
            ..TaskSummary::default()
        },
        |mut acc, task| {
            match task.status {
                TaskStatus::Todo => acc.todo += 1,
                TaskStatus::InProgress => acc.in_progress += 1,
                TaskStatus::Done => acc.done += 1,
            }
            acc
        },
    )
}

pub fn add(tasks: &mut Vec<Task>, new: NewTask, today: NaiveDate) -> Result<Task, AppError> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("task title must not be empty"));
    }

    let next_id = tasks
        .iter()
        .filter_map(|task| task.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1;

    let task = Task {
        id: next_id.to_string(),
        title: title.to_string(),
        description: new
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        priority: new.priority,
        status: new.status.unwrap_or_default(),
        due_date: new.due_date,
        created_at: today,
        tags: new.tags,
    };
    tasks.push(task.clone());
    Ok(task)
}

pub fn set_status(tasks: &mut [Task], id: &str, status: TaskStatus) -> Result<Task, AppError> {
    let task = find_mut(tasks, id)?;
    task.status = status;
    Ok(task.clone())
}

/// Checkbox semantics: done goes back to todo, anything else becomes done.
pub fn toggle_done(tasks: &mut [Task], id: &str) -> Result<Task, AppError> {
    let task = find_mut(tasks, id)?;
    task.status = match task.status {
        TaskStatus::Done => TaskStatus::Todo,
        _ => TaskStatus::Done,
    };
    Ok(task.clone())
}

fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task, AppError> {
    tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or_else(|| AppError::not_found(format!("no task with id '{id}'")))
}
