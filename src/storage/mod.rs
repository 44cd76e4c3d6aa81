pub mod local;
pub mod remote;

use crate::calendar::DateRange;
use crate::daylog::{DayLog, LogCollection};
use crate::errors::StoreError;
use crate::models::AppData;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub use local::LocalLogStore;
pub use remote::{RemoteLogStore, RestLogTable, SessionProvider, StaticSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing was written because no user is signed in.
    Skipped,
}

/// Where day logs live. A day with no record loads as an empty `DayLog`.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn load_one(&self, date: NaiveDate) -> Result<DayLog, StoreError>;

    /// Logs for the days of `range` that have a record; other days are absent.
    async fn load_range(&self, range: DateRange) -> Result<LogCollection, StoreError>;

    async fn save(&self, log: &DayLog) -> Result<SaveOutcome, StoreError>;

    fn mode(&self) -> &'static str;
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!(path = %path.display(), "failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!(path = %path.display(), "failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)
        .map_err(|err| StoreError::Unavailable(err.to_string()))?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().expect("log buffer").clone()).expect("utf8 logs")
        }
    }

    #[tokio::test]
    async fn missing_or_garbled_data_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert!(load_data(&path).await.local_storage.is_empty());

        fs::write(&path, b"{not json").await.unwrap();
        assert!(load_data(&path).await.tasks.is_empty());
    }

    #[tokio::test]
    async fn persisted_data_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut data = AppData::default();
        data.local_storage
            .insert("daily-log-2026-03-01".into(), r#"["guitar"]"#.into());
        data.settings.dark_mode = true;

        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await;
        assert_eq!(loaded.local_storage, data.local_storage);
        assert!(loaded.settings.dark_mode);
    }

    #[tokio::test]
    async fn unreadable_data_file_is_logged_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let garbled = dir.path().join("garbled.json");
        fs::write(&garbled, b"{not json").await.unwrap();

        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        load_data(&garbled).await;
        load_data(dir.path()).await;

        let logs = buffer.contents();
        assert!(logs.contains("failed to parse data file"));
        assert!(logs.contains(&garbled.display().to_string()));
        assert!(logs.contains("failed to read data file"));
        assert!(logs.contains(&dir.path().display().to_string()));
    }
}
