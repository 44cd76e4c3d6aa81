use crate::calendar::parse_iso;
use crate::errors::ConfigError;
use crate::storage::remote::{RestConfig, UserId};
use chrono::NaiveDate;
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_LAUNCH_DATE: &str = "2026-02-22";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub activities_path: Option<PathBuf>,
    /// Earliest day that can be viewed or logged.
    pub launch_date: NaiveDate,
    pub backend: Option<BackendConfig>,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub rest: RestConfig,
    pub user_id: Option<UserId>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidVar { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let launch_date = match var("LAUNCH_DATE") {
            Some(value) => parse_iso(&value)
                .map_err(|_| ConfigError::InvalidVar { name: "LAUNCH_DATE", value })?,
            None => parse_iso(DEFAULT_LAUNCH_DATE).map_err(|_| ConfigError::InvalidVar {
                name: "LAUNCH_DATE",
                value: DEFAULT_LAUNCH_DATE.to_string(),
            })?,
        };

        let backend = match var("BACKEND_URL") {
            Some(base_url) => {
                let api_key = var("BACKEND_API_KEY").ok_or(ConfigError::InvalidVar {
                    name: "BACKEND_API_KEY",
                    value: String::new(),
                })?;
                Some(BackendConfig {
                    rest: RestConfig {
                        base_url,
                        api_key,
                        access_token: var("BACKEND_ACCESS_TOKEN"),
                    },
                    user_id: var("BACKEND_USER_ID").map(UserId::new),
                })
            }
            None => None,
        };

        Ok(Self {
            port,
            data_path: PathBuf::from(var("APP_DATA_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.into())),
            activities_path: var("APP_ACTIVITIES_PATH").map(PathBuf::from),
            launch_date,
            backend,
        })
    }
}
