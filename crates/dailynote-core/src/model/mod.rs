//! Plain value records for one tracked day.
//!
//! Every record here is owned by the [`Planner`](crate::Planner); other
//! components receive clones or shared borrows.

mod profile;

pub use profile::{AppSettings, Tone, UserProfile, WorkHours};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of archived days kept in history.
pub const HISTORY_LIMIT: usize = 30;

/// A to-do item for the current day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    /// Same-day reminder time, if any.
    #[serde(default)]
    pub scheduled_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    /// Set when the task was materialized from a [`DailyRoutine`].
    #[serde(default)]
    pub routine_id: Option<String>,
}

impl Task {
    /// Build a task from user input. Returns `None` when the title is blank.
    pub fn new(
        title: &str,
        scheduled_time: Option<NaiveDateTime>,
        created_at: NaiveDateTime,
    ) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            is_completed: false,
            scheduled_time,
            created_at,
            completed_at: None,
            routine_id: None,
        })
    }

    /// Incomplete and its reminder time has gone by.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.is_completed && self.scheduled_time.is_some_and(|at| at < now)
    }

    /// Fresh, unscheduled copy used when the task moves to a new day.
    pub fn carried_over(&self, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: self.title.clone(),
            is_completed: false,
            scheduled_time: None,
            created_at: now,
            completed_at: None,
            routine_id: None,
        }
    }
}

/// The record for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyData {
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Cumulative intake in milliliters.
    #[serde(default)]
    pub water_intake: u32,
}

impl DailyData {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            notes: String::new(),
            tasks: Vec::new(),
            water_intake: 0,
        }
    }

    pub fn with_tasks(date: NaiveDate, tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::new(date)
        }
    }

    /// Nothing worth archiving happened on this day.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.water_intake == 0
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed).count()
    }

    pub fn incomplete_count(&self) -> usize {
        self.tasks.len() - self.completed_count()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Combine a time of day with this record's date.
    pub fn at(&self, time: NaiveTime) -> NaiveDateTime {
        self.date.and_time(time)
    }
}

/// A single drink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterLogEntry {
    pub id: String,
    /// Milliliters, always positive.
    pub amount: u32,
    pub timestamp: NaiveDateTime,
}

impl WaterLogEntry {
    /// Returns `None` for a zero amount.
    pub fn new(amount: u32, timestamp: NaiveDateTime) -> Option<Self> {
        if amount == 0 {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            amount,
            timestamp,
        })
    }
}

/// A scheduled hydration target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterGoal {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub amount: u32,
    pub scheduled_time: NaiveDateTime,
    #[serde(default)]
    pub is_completed: bool,
}

impl WaterGoal {
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.is_completed && self.scheduled_time < now
    }
}

/// A completed task as remembered in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTaskRecord {
    pub title: String,
    pub completed_at: Option<NaiveDateTime>,
}

/// Immutable snapshot of a finished day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub water_intake: u32,
    pub water_goal: u32,
    #[serde(default)]
    pub completed_task_details: Vec<CompletedTaskRecord>,
    pub archived_at: NaiveDateTime,
}

impl DailySummary {
    pub fn from_day(day: &DailyData, water_goal: u32, archived_at: NaiveDateTime) -> Self {
        let completed_task_details = day
            .tasks
            .iter()
            .filter(|t| t.is_completed)
            .map(|t| CompletedTaskRecord {
                title: t.title.clone(),
                completed_at: t.completed_at,
            })
            .collect();

        Self {
            date: day.date,
            completed_tasks: day.completed_count(),
            total_tasks: day.tasks.len(),
            water_intake: day.water_intake,
            water_goal,
            completed_task_details,
            archived_at,
        }
    }

    /// 0.0 ..= 1.0; a day without tasks counts as 0.
    pub fn completion_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        self.completed_tasks as f64 / self.total_tasks as f64
    }

    /// Intake relative to goal, capped at 1.0.
    pub fn water_progress(&self) -> f64 {
        if self.water_goal == 0 {
            return 0.0;
        }
        (f64::from(self.water_intake) / f64::from(self.water_goal)).min(1.0)
    }
}

/// Prepend `summary` and keep at most [`HISTORY_LIMIT`] entries.
pub fn push_history(history: &mut Vec<DailySummary>, summary: DailySummary) {
    history.insert(0, summary);
    history.truncate(HISTORY_LIMIT);
}

/// Recurring task template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRoutine {
    pub id: String,
    pub title: String,
    pub hour: u32,
    pub minute: u32,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl DailyRoutine {
    /// Returns `None` for a blank title or a time outside the day.
    pub fn new(title: &str, hour: u32, minute: u32) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            hour,
            minute,
            is_enabled: true,
        })
    }

    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    /// Materialize as a task on `date`.
    pub fn to_task(&self, date: NaiveDate, now: NaiveDateTime) -> Option<Task> {
        let mut task = Task::new(&self.title, self.time().map(|t| date.and_time(t)), now)?;
        task.routine_id = Some(self.id.clone());
        Some(task)
    }
}
