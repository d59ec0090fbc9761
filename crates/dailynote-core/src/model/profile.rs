//! User profile, app settings and the work-hour bounds they share.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Validated work-hour bounds: `start < end`, both within 0..=23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHours {
    start: u32,
    end: u32,
}

impl WorkHours {
    pub fn new(start: u32, end: u32) -> Result<Self, ValidationError> {
        if start >= end || end > 23 {
            return Err(ValidationError::InvalidWorkHours { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// `hour` falls in `[start, end)`.
    pub fn contains_hour(&self, hour: f64) -> bool {
        hour >= f64::from(self.start) && hour < f64::from(self.end)
    }
}

impl Default for WorkHours {
    fn default() -> Self {
        Self { start: 9, end: 18 }
    }
}

/// Voice used for notification copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Gentle,
    #[default]
    Cheerful,
    /// Forces the stressed message set regardless of the day's load.
    Harsh,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tone::Gentle => "gentle",
            Tone::Cheerful => "cheerful",
            Tone::Harsh => "harsh",
        };
        f.write_str(s)
    }
}

impl FromStr for Tone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gentle" => Ok(Tone::Gentle),
            "cheerful" => Ok(Tone::Cheerful),
            "harsh" => Ok(Tone::Harsh),
            other => Err(ValidationError::InvalidValue {
                field: "tone".into(),
                message: format!("unknown tone '{other}' (expected gentle, cheerful or harsh)"),
            }),
        }
    }
}

/// Application-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_daily_water_goal")]
    pub daily_water_goal: u32,
    #[serde(default = "default_reminder_interval")]
    pub reminder_interval_minutes: u32,
    #[serde(default)]
    pub launch_at_login: bool,
    #[serde(default = "default_work_start")]
    pub work_start_hour: u32,
    #[serde(default = "default_work_end")]
    pub work_end_hour: u32,
}

fn default_daily_water_goal() -> u32 {
    2000
}
fn default_reminder_interval() -> u32 {
    60
}
fn default_work_start() -> u32 {
    9
}
fn default_work_end() -> u32 {
    18
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            daily_water_goal: default_daily_water_goal(),
            reminder_interval_minutes: default_reminder_interval(),
            launch_at_login: false,
            work_start_hour: default_work_start(),
            work_end_hour: default_work_end(),
        }
    }
}

impl AppSettings {
    pub fn work_hours(&self) -> Result<WorkHours, ValidationError> {
        WorkHours::new(self.work_start_hour, self.work_end_hour)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.work_hours()?;
        if self.daily_water_goal == 0 {
            return Err(ValidationError::InvalidValue {
                field: "daily_water_goal".into(),
                message: "must be positive".into(),
            });
        }
        if self.reminder_interval_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "reminder_interval_minutes".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Who the user is and how they want to be spoken to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub nickname: String,
    #[serde(default = "default_work_start")]
    pub work_start_hour: u32,
    #[serde(default = "default_work_end")]
    pub work_end_hour: u32,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub has_completed_onboarding: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            work_start_hour: default_work_start(),
            work_end_hour: default_work_end(),
            tone: Tone::default(),
            has_completed_onboarding: false,
        }
    }
}

impl UserProfile {
    pub fn work_hours(&self) -> Result<WorkHours, ValidationError> {
        WorkHours::new(self.work_start_hour, self.work_end_hour)
    }

    /// Name used in copy; falls back to a neutral address.
    pub fn display_name(&self) -> &str {
        let name = self.nickname.trim();
        if name.is_empty() {
            "there"
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_hours_reject_inverted_or_out_of_range() {
        assert!(WorkHours::new(9, 18).is_ok());
        assert_eq!(
            WorkHours::new(18, 9),
            Err(ValidationError::InvalidWorkHours { start: 18, end: 9 })
        );
        assert!(WorkHours::new(9, 9).is_err());
        assert!(WorkHours::new(9, 24).is_err());
    }

    #[test]
    fn work_hours_contains_is_half_open() {
        let hours = WorkHours::new(9, 18).unwrap();
        assert!(hours.contains_hour(9.0));
        assert!(hours.contains_hour(17.99));
        assert!(!hours.contains_hour(18.0));
        assert!(!hours.contains_hour(8.5));
    }

    #[test]
    fn tone_parses_case_insensitively() {
        assert_eq!("HARSH".parse::<Tone>().unwrap(), Tone::Harsh);
        assert_eq!(" gentle ".parse::<Tone>().unwrap(), Tone::Gentle);
        assert!("grumpy".parse::<Tone>().is_err());
    }

    #[test]
    fn settings_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.daily_water_goal, 2000);
        assert_eq!(settings.reminder_interval_minutes, 60);
        assert_eq!(settings.work_hours().unwrap(), WorkHours::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn settings_missing_fields_use_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"daily_water_goal": 2500}"#).unwrap();
        assert_eq!(settings.daily_water_goal, 2500);
        assert_eq!(settings.work_end_hour, 18);
    }

    #[test]
    fn display_name_falls_back() {
        let mut profile = UserProfile::default();
        assert_eq!(profile.display_name(), "there");
        profile.nickname = " Sam ".into();
        assert_eq!(profile.display_name(), "Sam");
    }
}
