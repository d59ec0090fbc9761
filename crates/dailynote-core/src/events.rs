use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::work_session::WorkCue;

/// Every state change in the planner produces an Event.
/// Hosts drain them with `Planner::take_events` to refresh views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: String,
        at: NaiveDateTime,
    },
    TaskToggled {
        task_id: String,
        completed: bool,
        /// Congratulation copy when the task was just completed.
        message: Option<Message>,
        at: NaiveDateTime,
    },
    TaskUpdated {
        task_id: String,
        at: NaiveDateTime,
    },
    TaskDeleted {
        task_id: String,
        at: NaiveDateTime,
    },
    NotesChanged {
        at: NaiveDateTime,
    },
    WaterLogged {
        entry_id: String,
        amount: u32,
        total: u32,
        at: NaiveDateTime,
    },
    WaterGoalToggled {
        goal_id: String,
        completed: bool,
        at: NaiveDateTime,
    },
    ScheduleRegenerated {
        date: NaiveDate,
        goals: usize,
        at: NaiveDateTime,
    },
    RolledOver {
        from: NaiveDate,
        to: NaiveDate,
        archived: bool,
        carried_over: usize,
        at: NaiveDateTime,
    },
    SettingsChanged {
        at: NaiveDateTime,
    },
    ProfileChanged {
        at: NaiveDateTime,
    },
    RoutinesChanged {
        at: NaiveDateTime,
    },
    RoutinesApplied {
        added: usize,
        at: NaiveDateTime,
    },
    NotificationSnoozed {
        notification_id: String,
        at: NaiveDateTime,
    },
    WorkCue {
        cue: WorkCue,
        at: NaiveDateTime,
    },
}
