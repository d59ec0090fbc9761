//! Notification instructions.
//!
//! The core never delivers anything. It hands [`NotificationRequest`]s and
//! cancellations to an injected [`NotificationSink`]; the host decides how
//! (and whether) they reach the user.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::model::{Task, WaterGoal};

/// Minutes between a reminder and its overdue follow-up.
pub const OVERDUE_FOLLOW_UP_MINUTES: i64 = 10;
/// Minutes a snoozed notification is pushed back.
pub const SNOOZE_MINUTES: i64 = 10;

pub const WATER_PREFIX: &str = "water-";
pub const TASK_PREFIX: &str = "task-";
const SNOOZE_SUFFIX: &str = "-snooze";
const OVERDUE_TAG: &str = "overdue-";

/// Delivery category; decides which actions the notification offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    WaterReminder,
    TaskReminder,
    /// Work-session cues; carry no actions.
    General,
}

impl NotificationCategory {
    pub fn actions(&self) -> &'static [NotificationAction] {
        match self {
            NotificationCategory::WaterReminder => {
                &[NotificationAction::MarkDrunk, NotificationAction::Snooze]
            }
            NotificationCategory::TaskReminder => &[NotificationAction::Snooze],
            NotificationCategory::General => &[],
        }
    }
}

/// User response to a delivered notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    MarkDrunk,
    Snooze,
}

/// One "show this text at this time" instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub id: String,
    pub fire_at: NaiveDateTime,
    pub title: String,
    pub body: String,
    pub category: NotificationCategory,
}

impl NotificationRequest {
    /// Copy pushed [`SNOOZE_MINUTES`] past `now`.
    pub fn snoozed(&self, now: NaiveDateTime) -> Self {
        let id = if self.id.ends_with(SNOOZE_SUFFIX) {
            self.id.clone()
        } else {
            format!("{}{SNOOZE_SUFFIX}", self.id)
        };
        Self {
            id,
            fire_at: now + Duration::minutes(SNOOZE_MINUTES),
            ..self.clone()
        }
    }
}

/// Receiver of notification instructions.
pub trait NotificationSink: Send + Sync {
    fn schedule_at(&self, request: NotificationRequest);

    fn cancel(&self, id: &str);

    /// Cancel every pending instruction whose id starts with `prefix`.
    fn cancel_all(&self, prefix: &str);
}

/// Sink that keeps pending instructions in memory, keyed by id.
///
/// Scheduling an id that is already pending replaces it.
#[derive(Debug, Default)]
pub struct MemorySink {
    pending: Mutex<BTreeMap<String, NotificationRequest>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending instructions ordered by fire time.
    pub fn pending(&self) -> Vec<NotificationRequest> {
        let mut list: Vec<_> = match self.pending.lock() {
            Ok(p) => p.values().cloned().collect(),
            Err(_) => Vec::new(),
        };
        list.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.id.cmp(&b.id)));
        list
    }

    pub fn get(&self, id: &str) -> Option<NotificationRequest> {
        self.pending.lock().ok()?.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Remove and return everything due at or before `now`.
    pub fn take_due(&self, now: NaiveDateTime) -> Vec<NotificationRequest> {
        let Ok(mut pending) = self.pending.lock() else {
            return Vec::new();
        };
        let due: Vec<String> = pending
            .iter()
            .filter(|(_, r)| r.fire_at <= now)
            .map(|(id, _)| id.clone())
            .collect();
        let mut fired: Vec<_> = due.iter().filter_map(|id| pending.remove(id)).collect();
        fired.sort_by_key(|r| r.fire_at);
        fired
    }

    /// Replace the whole pending set, e.g. after loading it from disk.
    pub fn restore(&self, requests: Vec<NotificationRequest>) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.clear();
            pending.extend(requests.into_iter().map(|r| (r.id.clone(), r)));
        }
    }
}

impl NotificationSink for MemorySink {
    fn schedule_at(&self, request: NotificationRequest) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(request.id.clone(), request);
        }
    }

    fn cancel(&self, id: &str) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(id);
        }
    }

    fn cancel_all(&self, prefix: &str) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.retain(|id, _| !id.starts_with(prefix));
        }
    }
}

pub fn water_id(goal_id: &str) -> String {
    format!("{WATER_PREFIX}{goal_id}")
}

pub fn water_overdue_id(goal_id: &str) -> String {
    format!("{WATER_PREFIX}{OVERDUE_TAG}{goal_id}")
}

pub fn task_id(task_id: &str) -> String {
    format!("{TASK_PREFIX}{task_id}")
}

pub fn task_overdue_id(task_id: &str) -> String {
    format!("{TASK_PREFIX}{OVERDUE_TAG}{task_id}")
}

/// Every identifier that may be pending for a task, snoozed copies included.
pub fn task_ids(id: &str) -> [String; 4] {
    let main = task_id(id);
    let overdue = task_overdue_id(id);
    let main_snoozed = format!("{main}{SNOOZE_SUFFIX}");
    let overdue_snoozed = format!("{overdue}{SNOOZE_SUFFIX}");
    [main, overdue, main_snoozed, overdue_snoozed]
}

/// Whether `id` names an overdue follow-up rather than the first reminder.
pub fn is_overdue_id(id: &str) -> bool {
    [WATER_PREFIX, TASK_PREFIX]
        .iter()
        .any(|prefix| id.strip_prefix(prefix).is_some_and(|rest| rest.starts_with(OVERDUE_TAG)))
}

/// Every identifier that may be pending for a water goal.
pub fn water_ids(goal_id: &str) -> [String; 4] {
    let main = water_id(goal_id);
    let overdue = water_overdue_id(goal_id);
    let main_snoozed = format!("{main}{SNOOZE_SUFFIX}");
    let overdue_snoozed = format!("{overdue}{SNOOZE_SUFFIX}");
    [main, overdue, main_snoozed, overdue_snoozed]
}

/// What a notification id refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTarget {
    WaterGoal(String),
    Task(String),
}

/// Recover the entity id from a notification id.
pub fn parse_target(id: &str) -> Option<NotificationTarget> {
    let id = id.strip_suffix(SNOOZE_SUFFIX).unwrap_or(id);
    if let Some(rest) = id.strip_prefix(WATER_PREFIX) {
        let goal = rest.strip_prefix(OVERDUE_TAG).unwrap_or(rest);
        return (!goal.is_empty()).then(|| NotificationTarget::WaterGoal(goal.to_string()));
    }
    if let Some(rest) = id.strip_prefix(TASK_PREFIX) {
        let task = rest.strip_prefix(OVERDUE_TAG).unwrap_or(rest);
        return (!task.is_empty()).then(|| NotificationTarget::Task(task.to_string()));
    }
    None
}

/// Instructions for a water goal: the reminder and its overdue follow-up.
///
/// Completed goals and instructions not strictly after `now` are dropped.
pub fn plan_water_goal(
    goal: &WaterGoal,
    now: NaiveDateTime,
    reminder: Message,
    overdue: Message,
) -> Vec<NotificationRequest> {
    if goal.is_completed {
        return Vec::new();
    }
    let follow_up_at = goal.scheduled_time + Duration::minutes(OVERDUE_FOLLOW_UP_MINUTES);

    [
        (water_id(&goal.id), goal.scheduled_time, reminder),
        (water_overdue_id(&goal.id), follow_up_at, overdue),
    ]
    .into_iter()
    .filter(|(_, fire_at, _)| *fire_at > now)
    .map(|(id, fire_at, copy)| NotificationRequest {
        id,
        fire_at,
        title: copy.title,
        body: copy.body,
        category: NotificationCategory::WaterReminder,
    })
    .collect()
}

/// Instructions for a scheduled task: the reminder and its overdue
/// follow-up.
///
/// Completed or unscheduled tasks and instructions not strictly after `now`
/// are dropped.
pub fn plan_task(
    task: &Task,
    now: NaiveDateTime,
    reminder: Message,
    overdue: Message,
) -> Vec<NotificationRequest> {
    let Some(at) = task.scheduled_time.filter(|_| !task.is_completed) else {
        return Vec::new();
    };
    let follow_up_at = at + Duration::minutes(OVERDUE_FOLLOW_UP_MINUTES);

    [
        (task_id(&task.id), at, reminder),
        (task_overdue_id(&task.id), follow_up_at, overdue),
    ]
    .into_iter()
    .filter(|(_, fire_at, _)| *fire_at > now)
    .map(|(id, fire_at, copy)| NotificationRequest {
        id,
        fire_at,
        title: copy.title,
        body: copy.body,
        category: NotificationCategory::TaskReminder,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn copy(text: &str) -> Message {
        Message {
            title: text.into(),
            body: text.into(),
        }
    }

    fn goal(h: u32, m: u32) -> WaterGoal {
        WaterGoal {
            id: "20250310-00".into(),
            label: "early hydration".into(),
            amount: 300,
            scheduled_time: ts(h, m),
            is_completed: false,
        }
    }

    #[test]
    fn future_goal_yields_reminder_and_follow_up() {
        let planned = plan_water_goal(&goal(9, 0), ts(8, 0), copy("drink"), copy("late"));
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].id, "water-20250310-00");
        assert_eq!(planned[0].fire_at, ts(9, 0));
        assert_eq!(planned[1].id, "water-overdue-20250310-00");
        assert_eq!(planned[1].fire_at, ts(9, 10));
        assert_eq!(planned[1].title, "late");
    }

    #[test]
    fn past_instructions_are_suppressed() {
        let planned = plan_water_goal(&goal(9, 0), ts(9, 5), copy("drink"), copy("late"));
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].id, "water-overdue-20250310-00");

        let planned = plan_water_goal(&goal(9, 0), ts(9, 10), copy("drink"), copy("late"));
        assert!(planned.is_empty());
    }

    #[test]
    fn completed_goal_yields_nothing() {
        let mut g = goal(9, 0);
        g.is_completed = true;
        assert!(plan_water_goal(&g, ts(8, 0), copy("a"), copy("b")).is_empty());
    }

    #[test]
    fn task_reminder_only_for_future_incomplete() {
        let mut task = Task::new("ship it", Some(ts(15, 0)), ts(9, 0)).unwrap();
        let planned = plan_task(&task, ts(10, 0), copy("x"), copy("late"));
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].id, format!("task-{}", task.id));
        assert_eq!(planned[0].category, NotificationCategory::TaskReminder);
        assert_eq!(planned[1].id, format!("task-overdue-{}", task.id));
        assert_eq!(planned[1].fire_at, ts(15, 10));
        assert_eq!(planned[1].title, "late");

        // Reminder time reached: only the follow-up is left
        let planned = plan_task(&task, ts(15, 0), copy("x"), copy("late"));
        assert_eq!(planned.len(), 1);
        assert!(is_overdue_id(&planned[0].id));

        task.is_completed = true;
        assert!(plan_task(&task, ts(10, 0), copy("x"), copy("late")).is_empty());
        let unscheduled = Task::new("later", None, ts(9, 0)).unwrap();
        assert!(plan_task(&unscheduled, ts(10, 0), copy("x"), copy("late")).is_empty());
    }

    #[test]
    fn parse_target_recovers_entity_ids() {
        assert_eq!(
            parse_target("water-20250310-03"),
            Some(NotificationTarget::WaterGoal("20250310-03".into()))
        );
        assert_eq!(
            parse_target("water-overdue-20250310-03-snooze"),
            Some(NotificationTarget::WaterGoal("20250310-03".into()))
        );
        assert_eq!(
            parse_target("task-abc"),
            Some(NotificationTarget::Task("abc".into()))
        );
        assert_eq!(
            parse_target("task-overdue-abc-snooze"),
            Some(NotificationTarget::Task("abc".into()))
        );
        assert!(is_overdue_id("task-overdue-abc"));
        assert!(!is_overdue_id("water-20250310-03"));
        assert_eq!(parse_target("work-start-2025-03-10"), None);
        assert_eq!(parse_target("task-"), None);
    }

    #[test]
    fn snooze_keeps_stable_id() {
        let request = NotificationRequest {
            id: "task-abc".into(),
            fire_at: ts(9, 0),
            title: "t".into(),
            body: "b".into(),
            category: NotificationCategory::TaskReminder,
        };
        let once = request.snoozed(ts(9, 1));
        assert_eq!(once.id, "task-abc-snooze");
        assert_eq!(once.fire_at, ts(9, 11));
        let twice = once.snoozed(ts(9, 12));
        assert_eq!(twice.id, "task-abc-snooze");
    }

    #[test]
    fn memory_sink_cancels_by_prefix_and_takes_due() {
        let sink = MemorySink::new();
        for (id, h) in [("water-a", 9), ("water-b", 11), ("task-c", 10)] {
            sink.schedule_at(NotificationRequest {
                id: id.into(),
                fire_at: ts(h, 0),
                title: String::new(),
                body: String::new(),
                category: NotificationCategory::General,
            });
        }
        let due = sink.take_due(ts(10, 0));
        assert_eq!(
            due.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["water-a", "task-c"]
        );
        sink.cancel_all(WATER_PREFIX);
        assert!(sink.pending().is_empty());
    }

    #[test]
    fn categories_expose_actions() {
        assert_eq!(
            NotificationCategory::WaterReminder.actions(),
            &[NotificationAction::MarkDrunk, NotificationAction::Snooze]
        );
        assert_eq!(
            NotificationCategory::TaskReminder.actions(),
            &[NotificationAction::Snooze]
        );
    }
}
