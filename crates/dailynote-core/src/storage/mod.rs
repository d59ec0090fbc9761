//! Key-to-blob persistence and host configuration.

pub mod config;
mod kv;

pub use config::Config;
pub use kv::{JsonFileStore, MemoryStore};

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ConfigError, StoreError};

/// Persisted record keys.
pub mod keys {
    pub const DAILY_DATA: &str = "dailyNoteData";
    pub const WATER_LOG: &str = "waterLog";
    pub const WATER_GOALS: &str = "waterGoals";
    pub const APP_SETTINGS: &str = "appSettings";
    pub const DAILY_HISTORY: &str = "dailyHistory";
    pub const USER_PROFILE: &str = "userProfile";
    pub const ONBOARDING_DONE: &str = "hasCompletedOnboarding";
    pub const DAILY_ROUTINES: &str = "dailyRoutines";

    pub const ALL: [&str; 8] = [
        DAILY_DATA,
        WATER_LOG,
        WATER_GOALS,
        APP_SETTINGS,
        DAILY_HISTORY,
        USER_PROFILE,
        ONBOARDING_DONE,
        DAILY_ROUTINES,
    ];
}

/// Synchronous key-to-JSON-blob store.
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Decode `key`, `Ok(None)` when absent.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(blob) => serde_json::from_str(&blob)
            .map(Some)
            .map_err(|source| StoreError::Deserialize {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let blob = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &blob)
}

/// Decode `key` or fall back to `fallback()` when missing or unreadable.
pub fn load_or_else<T, F>(store: &dyn KeyValueStore, key: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match read_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => fallback(),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored record unreadable, using defaults");
            fallback()
        }
    }
}

/// Returns `~/.config/dailynote[-dev]/` based on DAILYNOTE_ENV.
///
/// `DAILYNOTE_HOME` overrides the location entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("DAILYNOTE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("DAILYNOTE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("dailynote-dev")
            } else {
                base_dir.join("dailynote")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppSettings;

    #[test]
    fn missing_key_uses_fallback() {
        let store = MemoryStore::new();
        let settings: AppSettings = load_or_else(&store, keys::APP_SETTINGS, AppSettings::default);
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn corrupt_blob_uses_fallback() {
        let store = MemoryStore::new();
        store.set(keys::APP_SETTINGS, "{not json").unwrap();
        let settings: AppSettings = load_or_else(&store, keys::APP_SETTINGS, AppSettings::default);
        assert_eq!(settings, AppSettings::default());

        let err = read_json::<AppSettings>(&store, keys::APP_SETTINGS).unwrap_err();
        assert!(matches!(err, StoreError::Deserialize { .. }));
    }

    #[test]
    fn written_records_read_back() {
        let store = MemoryStore::new();
        let settings = AppSettings {
            daily_water_goal: 2400,
            ..AppSettings::default()
        };
        write_json(&store, keys::APP_SETTINGS, &settings).unwrap();
        let loaded: Option<AppSettings> = read_json(&store, keys::APP_SETTINGS).unwrap();
        assert_eq!(loaded, Some(settings));
    }
}
