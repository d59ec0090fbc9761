//! Shared plumbing for commands.

use std::sync::Arc;

use chrono::NaiveTime;
use dailynote_core::{
    Config, JsonFileStore, KeyValueStore, Planner, RolloverPolicy, SystemClock, ValidationError,
};
use serde::Serialize;

use crate::notifier::StoreNotifier;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// A loaded planner plus the notifier it schedules into.
pub struct Session {
    pub planner: Planner,
    pub notifier: Arc<StoreNotifier>,
}

impl Session {
    pub fn open(config: &Config) -> CliResult<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(config.store_dir()?)?);
        let notifier = Arc::new(StoreNotifier::load(store.clone()));
        let policy = RolloverPolicy::new().with_boundary(config.day_boundary());
        let planner = Planner::load(store, Arc::new(SystemClock), notifier.clone(), policy);
        Ok(Self { planner, notifier })
    }

    /// Persist everything the command touched.
    pub fn close(mut self) -> CliResult {
        self.planner.flush();
        self.notifier.save()?;
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse `HH:MM`.
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| ValidationError::InvalidValue {
        field: "time".into(),
        message: format!("expected HH:MM, got '{value}': {e}"),
    })
}

/// Resolve a full id or a unique prefix of one.
pub fn resolve_id<'a, I>(ids: I, query: &str) -> Result<String, ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let matches: Vec<&str> = ids.into_iter().filter(|id| id.starts_with(query)).collect();
    if let Some(exact) = matches.iter().find(|id| **id == query) {
        return Ok(exact.to_string());
    }
    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => Err(ValidationError::InvalidValue {
            field: "id".into(),
            message: format!("no match for '{query}'"),
        }),
        _ => Err(ValidationError::InvalidValue {
            field: "id".into(),
            message: format!("'{query}' is ambiguous ({} matches)", matches.len()),
        }),
    }
}

/// First eight characters, for listings.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_times() {
        assert_eq!(parse_time("07:05").unwrap(), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn resolves_prefixes() {
        let ids = ["abc123", "abd456", "20250310-01"];
        assert_eq!(resolve_id(ids, "abc").unwrap(), "abc123");
        assert_eq!(resolve_id(ids, "20250310-01").unwrap(), "20250310-01");
        assert!(resolve_id(ids, "ab").is_err());
        assert!(resolve_id(ids, "zz").is_err());
    }
}
