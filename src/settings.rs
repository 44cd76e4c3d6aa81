use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const ACCENT_COLORS: [&str; 5] = ["Indigo", "Violet", "Sky", "Emerald", "Rose"];
const DAILY_TASK_GOAL: RangeInclusive<u32> = 1..=50;
const FOCUS_MINUTES: RangeInclusive<u32> = 5..=120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub name: String,
    pub email: String,
    pub timezone: String,
    pub push_notifications: bool,
    pub focus_reminders: bool,
    pub weekly_digest: bool,
    pub dark_mode: bool,
    pub accent_color: String,
    pub daily_task_goal: u32,
    pub focus_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            timezone: String::new(),
            push_notifications: true,
            focus_reminders: true,
            weekly_digest: false,
            dark_mode: false,
            accent_color: ACCENT_COLORS[0].to_string(),
            daily_task_goal: 10,
            focus_minutes: 25,
        }
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub timezone: Option<String>,
    pub push_notifications: Option<bool>,
    pub focus_reminders: Option<bool>,
    pub weekly_digest: Option<bool>,
    pub dark_mode: Option<bool>,
    pub accent_color: Option<String>,
    pub daily_task_goal: Option<u32>,
    pub focus_minutes: Option<u32>,
}

impl Settings {
    /// Applies `patch`, leaving `self` untouched when any field is out of bounds.
    pub fn apply(&mut self, patch: SettingsPatch) -> Result<(), AppError> {
        if let Some(goal) = patch.daily_task_goal {
            check_bounds("daily_task_goal", goal, DAILY_TASK_GOAL)?;
        }
        if let Some(minutes) = patch.focus_minutes {
            check_bounds("focus_minutes", minutes, FOCUS_MINUTES)?;
        }
        let accent = match patch.accent_color {
            Some(color) => Some(
                ACCENT_COLORS
                    .iter()
                    .find(|name| name.eq_ignore_ascii_case(color.trim()))
                    .ok_or_else(|| AppError::bad_request(format!("unknown accent color '{color}'")))?
                    .to_string(),
            ),
            None => None,
        };

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(timezone) = patch.timezone {
            self.timezone = timezone.trim().to_string();
        }
        if let Some(value) = patch.push_notifications {
            self.push_notifications = value;
        }
        if let Some(value) = patch.focus_reminders {
            self.focus_reminders = value;
        }
        if let Some(value) = patch.weekly_digest {
            self.weekly_digest = value;
        }
        if let Some(value) = patch.dark_mode {
            self.dark_mode = value;
        }
        if let Some(accent) = accent {
            self.accent_color = accent;
        }
        if let Some(goal) = patch.daily_task_goal {
            self.daily_task_goal = goal;
        }
        if let Some(minutes) = patch.focus_minutes {
            self.focus_minutes = minutes;
        }
        Ok(())
    }
}

fn check_bounds(field: &str, value: u32, bounds: RangeInclusive<u32>) -> Result<(), AppError> {
    if bounds.contains(&value) {
        Ok(())
    } else {
        Err(AppError::bad_request(format!(
            "{field} must be between {} and {}",
            bounds.start(),
            bounds.end()
        )))
    }
}
