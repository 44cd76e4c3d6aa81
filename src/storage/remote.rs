//! Day logs in the hosted `daily_logs` table, one row per (user, date).

use super::{LogStore, SaveOutcome};
use crate::activities::ActivityId;
use crate::calendar::{DateRange, date_key};
use crate::daylog::{DayLog, LogCollection};
use crate::errors::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

const TABLE_PATH: &str = "/rest/v1/daily_logs";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row shape of `daily_logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    pub user_id: UserId,
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Option<Vec<ActivityId>>,
    #[serde(default)]
    pub completed_at: Option<BTreeMap<ActivityId, DateTime<Utc>>>,
}

impl LogRow {
    fn from_log(user_id: UserId, log: &DayLog) -> Self {
        Self {
            user_id,
            date: log.date,
            activities: Some(log.completed_activities.iter().cloned().collect()),
            completed_at: Some(log.completed_at.clone()),
        }
    }

    /// Timestamps for ids missing from `activities` are dropped.
    fn into_log(self) -> DayLog {
        let done: BTreeSet<ActivityId> = self.activities.unwrap_or_default().into_iter().collect();
        let completed_at = self
            .completed_at
            .unwrap_or_default()
            .into_iter()
            .filter(|(id, _)| done.contains(id))
            .collect();
        DayLog {
            date: self.date,
            completed_activities: done,
            completed_at,
        }
    }
}

/// Row access to the backend table.
#[async_trait]
pub trait LogTable: Send + Sync {
    async fn select_one(&self, user: &UserId, date: NaiveDate)
    -> Result<Option<LogRow>, StoreError>;

    async fn select_range(
        &self,
        user: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LogRow>, StoreError>;

    /// Insert or replace on the `(user_id, date)` key.
    async fn upsert(&self, row: &LogRow) -> Result<(), StoreError>;
}

/// Who is signed in, if anyone.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_user(&self) -> Option<UserId>;
}

/// Session fixed at start-up from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<UserId>,
}

impl StaticSession {
    pub fn new(user: Option<UserId>) -> Self {
        Self { user }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

pub struct RemoteLogStore {
    table: Arc<dyn LogTable>,
    session: Arc<dyn SessionProvider>,
}

impl RemoteLogStore {
    pub fn new(table: Arc<dyn LogTable>, session: Arc<dyn SessionProvider>) -> Self {
        Self { table, session }
    }
}

#[async_trait]
impl LogStore for RemoteLogStore {
    async fn load_one(&self, date: NaiveDate) -> Result<DayLog, StoreError> {
        let Some(user) = self.session.current_user().await else {
            return Ok(DayLog::empty(date));
        };
        let row = self.table.select_one(&user, date).await?;
        Ok(row.map_or_else(|| DayLog::empty(date), LogRow::into_log))
    }

    async fn load_range(&self, range: DateRange) -> Result<LogCollection, StoreError> {
        let Some(user) = self.session.current_user().await else {
            return Ok(LogCollection::new());
        };
        let rows = self.table.select_range(&user, range.start(), range.end()).await?;
        Ok(rows
            .into_iter()
            .filter(|row| range.contains(row.date))
            .map(|row| (row.date, row.into_log()))
            .collect())
    }

    async fn save(&self, log: &DayLog) -> Result<SaveOutcome, StoreError> {
        let Some(user) = self.session.current_user().await else {
            debug!(date = %log.date, "no signed-in user, skipping remote save");
            return Ok(SaveOutcome::Skipped);
        };
        self.table.upsert(&LogRow::from_log(user, log)).await?;
        Ok(SaveOutcome::Saved)
    }

    fn mode(&self) -> &'static str {
        "remote"
    }
}

#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
    pub access_token: Option<String>,
}

/// `daily_logs` over the backend's REST interface.
pub struct RestLogTable {
    client: Client,
    config: RestConfig,
}

impl RestLogTable {
    pub fn new(config: RestConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: RestConfig) -> Self {
        Self { client, config }
    }

    fn url(&self) -> String {
        format!("{}{TABLE_PATH}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        request
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {token}"))
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Backend {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch(&self, query: &[(&str, String)]) -> Result<Vec<LogRow>, StoreError> {
        let request = self.authorize(self.client.get(self.url()).query(query));
        let response = Self::check(request.send().await?).await?;
        let rows = response.json::<Vec<LogRow>>().await.map_err(|err| {
            StoreError::Corrupt {
                key: TABLE_PATH.to_string(),
                reason: err.to_string(),
            }
        })?;
        Ok(rows)
    }
}

#[async_trait]
impl LogTable for RestLogTable {
    #[instrument(skip(self, user), fields(user = %user))]
    async fn select_one(
        &self,
        user: &UserId,
        date: NaiveDate,
    ) -> Result<Option<LogRow>, StoreError> {
        let rows = self
            .fetch(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{user}")),
                ("date", format!("eq.{}", date_key(date))),
            ])
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, user), fields(user = %user))]
    async fn select_range(
        &self,
        user: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LogRow>, StoreError> {
        self.fetch(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{user}")),
            ("date", format!("gte.{}", date_key(start))),
            ("date", format!("lte.{}", date_key(end))),
            ("order", "date.asc".to_string()),
        ])
        .await
    }

    #[instrument(skip(self, row), fields(user = %row.user_id, date = %row.date))]
    async fn upsert(&self, row: &LogRow) -> Result<(), StoreError> {
        let request = self.authorize(
            self.client
                .post(self.url())
                .query(&[("on_conflict", "user_id,date")])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&[row]),
        );
        Self::check(request.send().await?).await?;
        info!("upserted remote day log");
        Ok(())
    }
}

/// In-process `daily_logs` with the same unique key as the hosted table.
#[derive(Default)]
pub struct MemoryLogTable {
    rows: Mutex<BTreeMap<(UserId, NaiveDate), LogRow>>,
}

impl MemoryLogTable {
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl LogTable for MemoryLogTable {
    async fn select_one(
        &self,
        user: &UserId,
        date: NaiveDate,
    ) -> Result<Option<LogRow>, StoreError> {
        Ok(self.rows.lock().await.get(&(user.clone(), date)).cloned())
    }

    async fn select_range(
        &self,
        user: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LogRow>, StoreError> {
        Ok(self
            .rows
            .lock()
            .await
            .range((user.clone(), start)..=(user.clone(), end))
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn upsert(&self, row: &LogRow) -> Result<(), StoreError> {
        self.rows
            .lock()
            .await
            .insert((row.user_id.clone(), row.date), row.clone());
        Ok(())
    }
}
