use clap::Subcommand;
use dailynote_core::{AppSettings, Config, ValidationError};

use crate::common::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show tracker settings
    Show {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a tracker setting
    Set {
        /// Setting name (e.g. "daily_water_goal", "work_end_hour")
        key: String,
        /// New value
        value: String,
    },
}

fn invalid(key: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: key.to_string(),
        message: message.into(),
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, format!("expected a number, got '{value}'")))
}

fn with_value(
    mut settings: AppSettings,
    key: &str,
    value: &str,
) -> Result<AppSettings, ValidationError> {
    match key {
        "daily_water_goal" => settings.daily_water_goal = parse_u32(key, value)?,
        "reminder_interval_minutes" => settings.reminder_interval_minutes = parse_u32(key, value)?,
        "work_start_hour" => settings.work_start_hour = parse_u32(key, value)?,
        "work_end_hour" => settings.work_end_hour = parse_u32(key, value)?,
        "launch_at_login" => {
            settings.launch_at_login = value
                .trim()
                .parse()
                .map_err(|_| invalid(key, "expected true or false"))?
        }
        _ => return Err(invalid(key, "unknown setting")),
    }
    Ok(settings)
}

pub fn run(action: SettingsAction, config: &Config) -> CliResult {
    let mut session = Session::open(config)?;

    match action {
        SettingsAction::Show { json } => {
            let settings = session.planner.settings();
            if json {
                print_json(settings)?;
            } else {
                println!("daily_water_goal = {}", settings.daily_water_goal);
                println!(
                    "reminder_interval_minutes = {}",
                    settings.reminder_interval_minutes
                );
                println!("launch_at_login = {}", settings.launch_at_login);
                println!("work_start_hour = {}", settings.work_start_hour);
                println!("work_end_hour = {}", settings.work_end_hour);
            }
        }
        SettingsAction::Set { key, value } => {
            let settings = with_value(session.planner.settings().clone(), &key, &value)?;
            session.planner.update_settings(settings)?;
            println!("ok");
        }
    }

    session.close()
}
