//! TOML-based host configuration.
//!
//! Stores how the host runs the tracker, not the tracked data itself:
//! - Where the key-value store lives
//! - Which hour a new day starts at
//! - Runtime tick and save-debounce intervals
//! - The default log filter
//!
//! Configuration is stored at `~/.config/dailynote/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::clock::DayBoundary;
use crate::error::ConfigError;

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory for the JSON store. Defaults to `<config dir>/data`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Day-boundary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayConfig {
    #[serde(default)]
    pub boundary_hour: u32,
}

/// Runtime loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_60")]
    pub rollover_check_secs: u64,
    #[serde(default = "default_60")]
    pub work_tick_secs: u64,
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Host configuration.
///
/// Serialized to/from TOML at `~/.config/dailynote/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub day: DayConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_60() -> u64 {
    60
}
fn default_save_debounce_ms() -> u64 {
    500
}
fn default_log_filter() -> String {
    "warn,dailynote_core=info".into()
}

impl Default for DayConfig {
    fn default() -> Self {
        Self { boundary_hour: 0 }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rollover_check_secs: 60,
            work_tick_secs: 60,
            save_debounce_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Strings and unset optionals take the raw text.
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds out-of-range values, or if the default config cannot be written
    /// to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day.boundary_hour > 23 {
            return Err(ConfigError::InvalidValue {
                key: "day.boundary_hour".into(),
                message: "must be within 0-23".into(),
            });
        }
        for (key, value) in [
            ("runtime.rollover_check_secs", self.runtime.rollover_check_secs),
            ("runtime.work_tick_secs", self.runtime.work_tick_secs),
        ] {
            if value == 0 || value > 60 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "must be within 1-60 seconds".into(),
                });
            }
        }
        Ok(())
    }

    pub fn day_boundary(&self) -> DayBoundary {
        DayBoundary::at_hour(self.day.boundary_hour)
    }

    /// Directory holding the JSON store.
    pub fn store_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("data")),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.runtime.rollover_check_secs, 60);
        assert_eq!(parsed.runtime.save_debounce_ms, 500);
        assert_eq!(parsed.day.boundary_hour, 0);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.runtime.work_tick_secs, 60);
        assert_eq!(parsed.logging.filter, "warn,dailynote_core=info");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("day.boundary_hour").as_deref(), Some("0"));
        assert_eq!(cfg.get("runtime.save_debounce_ms").as_deref(), Some("500"));
        assert!(cfg.get("runtime.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("day.boundary_hour", "4").unwrap();
        assert_eq!(cfg.day_boundary(), DayBoundary::at_hour(4));
    }

    #[test]
    fn set_updates_optional_path() {
        let mut cfg = Config::default();
        cfg.set("storage.data_dir", "/tmp/dailynote-data").unwrap();
        assert_eq!(
            cfg.store_dir().unwrap(),
            PathBuf::from("/tmp/dailynote-data")
        );
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("runtime.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("runtime.work_tick_secs", "soon").is_err());
        assert_eq!(cfg.runtime.work_tick_secs, 60);
    }

    #[test]
    fn set_rejects_out_of_range_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("day.boundary_hour", "24").is_err());
        assert!(cfg.set("runtime.rollover_check_secs", "600").is_err());
        assert_eq!(cfg.day.boundary_hour, 0);
    }

    #[test]
    fn load_from_missing_file_writes_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.runtime.rollover_check_secs, 60);
        assert!(path.exists());
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[day]\nboundary_hour = \"late\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn load_from_rejects_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        std::fs::write(&path, "[runtime]\nrollover_check_secs = 600\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { key, .. }) if key == "runtime.rollover_check_secs"
        ));

        std::fs::write(&path, "[day]\nboundary_hour = 30\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { key, .. }) if key == "day.boundary_hour"
        ));
    }
}
