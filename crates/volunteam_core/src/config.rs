//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve store, dataset and logging locations for hosts.
//! - Pick up a project `.env` file the way the app build does.
//! - Pass third-party API keys through without ever logging them.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - Variables already in the process environment win over `.env` entries.
//! - `Debug` never prints API keys.

use crate::logging::default_log_level;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "VOLUNTEAM_DB_PATH";
pub const ENV_EVENTS_PATH: &str = "VOLUNTEAM_EVENTS_PATH";
pub const ENV_LOG_LEVEL: &str = "VOLUNTEAM_LOG_LEVEL";
pub const ENV_GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
pub const ENV_IMGBB_API_KEY: &str = "IMGBB_API_KEY";

const DEFAULT_DB_FILE_NAME: &str = "volunteam_session.sqlite3";
const DEFAULT_EVENTS_FILE_NAME: &str = "db.json";

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file backing the session store.
    pub db_path: PathBuf,
    /// JSON event dataset.
    pub events_path: PathBuf,
    pub log_level: String,
    pub google_maps_api_key: Option<String>,
    pub imgbb_api_key: Option<String>,
}

impl AppConfig {
    /// Host startup entry: loads `.env` (current dir or a parent) into the
    /// process environment, then resolves from it.
    ///
    /// A missing `.env` is normal; an unreadable one is logged and skipped.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!(
                "event=config_load module=config status=ok dotenv={}",
                path.display()
            ),
            Err(err) if err.not_found() => {
                debug!("event=config_load module=config status=ok dotenv=none")
            }
            Err(err) => warn!(
                "event=config_load module=config status=error error_code=dotenv_invalid error={err}"
            ),
        }
        Self::from_env()
    }

    /// Resolves configuration from the process environment layered over the
    /// entries of the dotenv file at `path`. The process is not modified.
    ///
    /// # Errors
    /// - The file cannot be read or has a malformed line.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let file_entries = dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_entries.get(key).cloned())
        }))
    }

    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            events_path: value(ENV_EVENTS_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EVENTS_FILE_NAME)),
            log_level: value(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            google_maps_api_key: value(ENV_GOOGLE_MAPS_API_KEY),
            imgbb_api_key: value(ENV_IMGBB_API_KEY),
        }
    }
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_path", &self.db_path)
            .field("events_path", &self.events_path)
            .field("log_level", &self.log_level)
            .field("google_maps_api_key", &redact(&self.google_maps_api_key))
            .field("imgbb_api_key", &redact(&self.imgbb_api_key))
            .finish()
    }
}

fn redact(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "<set>",
        None => "<unset>",
    }
}
