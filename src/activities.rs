use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

use crate::errors::ConfigError;

/// Stable short identifier of a trackable activity, e.g. `jogging`.
///
/// Kept as a string so the activity set can grow through configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDefinition {
    pub id: ActivityId,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl ActivityDefinition {
    fn new(id: &str, label: &str, icon: &str, color: &str) -> Self {
        Self {
            id: ActivityId::new(id),
            label: label.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

/// Ordered, read-only set of activities shared by every component.
#[derive(Debug, Clone)]
pub struct ActivityRegistry {
    activities: Vec<ActivityDefinition>,
}

impl Default for ActivityRegistry {
    fn default() -> Self {
        Self {
            activities: vec![
                ActivityDefinition::new("jogging", "Jogging", "activity", "orange"),
                ActivityDefinition::new("pushups", "Pushups", "dumbbell", "sky"),
                ActivityDefinition::new("vibecode", "Vibe Code", "code", "violet"),
                ActivityDefinition::new("guitar", "Guitar", "music", "emerald"),
            ],
        }
    }
}

impl ActivityRegistry {
    /// Builds a registry, rejecting empty ids and duplicates.
    pub fn new(activities: Vec<ActivityDefinition>) -> Result<Self, ConfigError> {
        let mut seen = std::collections::BTreeSet::new();
        for activity in &activities {
            let id = activity.id.as_str();
            if id.trim().is_empty() {
                return Err(ConfigError::Activities("activity id must not be empty".into()));
            }
            if !seen.insert(id) {
                return Err(ConfigError::Activities(format!("duplicate activity id '{id}'")));
            }
        }
        Ok(Self { activities })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let activities: Vec<ActivityDefinition> = serde_json::from_slice(bytes)
            .map_err(|err| ConfigError::Activities(err.to_string()))?;
        Self::new(activities)
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ConfigError::Activities(format!("{}: {err}", path.display())))?;
        Self::from_json(&bytes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityDefinition> {
        self.activities.iter()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ActivityDefinition> {
        self.activities.iter().find(|activity| activity.id.as_str() == id)
    }
}
