//! Day logs in the device's key-value storage.
//!
//! Each day is one entry, `daily-log-YYYY-MM-DD`, holding a JSON array of
//! activity ids. Completion times are not kept in this mode.

use super::{LogStore, SaveOutcome, persist_data};
use crate::activities::ActivityId;
use crate::calendar::{DateRange, date_key};
use crate::daylog::{DayLog, LogCollection};
use crate::errors::StoreError;
use crate::models::AppData;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::{collections::BTreeSet, path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::debug;

const KEY_PREFIX: &str = "daily-log-";

pub fn storage_key(date: NaiveDate) -> String {
    format!("{KEY_PREFIX}{}", date_key(date))
}

#[derive(Clone)]
pub struct LocalLogStore {
    data_path: PathBuf,
    data: Arc<Mutex<AppData>>,
}

impl LocalLogStore {
    pub fn new(data_path: PathBuf, data: Arc<Mutex<AppData>>) -> Self {
        Self { data_path, data }
    }

    /// Writes `done` for `date`, replacing whatever was stored.
    pub async fn save_set(
        &self,
        done: &BTreeSet<ActivityId>,
        date: NaiveDate,
    ) -> Result<(), StoreError> {
        let key = storage_key(date);
        let value = serde_json::to_string(&done.iter().collect::<Vec<_>>())
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        let mut data = self.data.lock().await;
        let mut next = data.clone();
        next.local_storage.insert(key.clone(), value);
        persist_data(&self.data_path, &next).await?;
        *data = next;
        debug!(%key, count = done.len(), "saved local day log");
        Ok(())
    }
}

fn parse_entry(key: &str, date: NaiveDate, raw: &str) -> Result<DayLog, StoreError> {
    let ids: Vec<ActivityId> = serde_json::from_str(raw).map_err(|err| StoreError::Corrupt {
        key: key.to_string(),
        reason: err.to_string(),
    })?;
    Ok(DayLog::from_activities(date, ids))
}

#[async_trait]
impl LogStore for LocalLogStore {
    async fn load_one(&self, date: NaiveDate) -> Result<DayLog, StoreError> {
        let key = storage_key(date);
        let data = self.data.lock().await;
        match data.local_storage.get(&key) {
            Some(raw) => parse_entry(&key, date, raw),
            None => Ok(DayLog::empty(date)),
        }
    }

    async fn load_range(&self, range: DateRange) -> Result<LogCollection, StoreError> {
        let data = self.data.lock().await;
        let mut logs = LogCollection::new();
        for date in range.days() {
            let key = storage_key(date);
            if let Some(raw) = data.local_storage.get(&key) {
                logs.insert(date, parse_entry(&key, date, raw)?);
            }
        }
        Ok(logs)
    }

    async fn save(&self, log: &DayLog) -> Result<SaveOutcome, StoreError> {
        self.save_set(&log.completed_activities, log.date).await?;
        Ok(SaveOutcome::Saved)
    }

    fn mode(&self) -> &'static str {
        "local"
    }
}
