//! The single owner of all tracked state.
//!
//! Every user action goes through [`Planner`]. It keeps the records in
//! memory, tracks which persisted keys changed, hands notification
//! instructions to the injected sink and records an [`Event`] per change.
//! Persistence is explicit: call [`Planner::flush`] (the runtime does this
//! on a debounce).

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime};

use crate::clock::Clock;
use crate::error::{StoreError, ValidationError};
use crate::events::Event;
use crate::message::{self, ContextInput, Message, MessageCategory, MessageContext, MessageParams};
use crate::model::{
    AppSettings, DailyData, DailyRoutine, DailySummary, Task, UserProfile, WaterGoal,
    WaterLogEntry, WorkHours, HISTORY_LIMIT,
};
use crate::notify::{
    self, NotificationAction, NotificationCategory, NotificationRequest, NotificationSink,
    NotificationTarget,
};
use crate::rollover::{DayState, RolloverEngine, RolloverPolicy, RolloverResult};
use crate::storage::{keys, load_or_else, write_json, KeyValueStore};
use crate::water;
use crate::work_session::{WorkCue, WorkSession};

pub struct Planner {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn NotificationSink>,
    engine: RolloverEngine,
    day: DayState,
    settings: AppSettings,
    profile: UserProfile,
    routines: Vec<DailyRoutine>,
    onboarded: bool,
    work: WorkSession,
    dirty: BTreeSet<&'static str>,
    events: Vec<Event>,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("day", &self.day)
            .field("settings", &self.settings)
            .field("profile", &self.profile)
            .field("routines", &self.routines)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Planner {
    /// Load every record from `store`, roll over a stale day and make sure
    /// today has a water schedule.
    ///
    /// Missing or unreadable records fall back to defaults.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSink>,
        policy: RolloverPolicy,
    ) -> Self {
        let engine = RolloverEngine::with_policy(policy);
        let today = engine.day_of(clock.now());
        let kv = store.as_ref();

        let mut history: Vec<DailySummary> = load_or_else(kv, keys::DAILY_HISTORY, Vec::new);
        history.truncate(HISTORY_LIMIT);

        let day = DayState {
            daily: load_or_else(kv, keys::DAILY_DATA, || DailyData::new(today)),
            water_log: load_or_else(kv, keys::WATER_LOG, Vec::new),
            water_goals: load_or_else(kv, keys::WATER_GOALS, Vec::new),
            history,
        };
        let settings: AppSettings = load_or_else(kv, keys::APP_SETTINGS, AppSettings::default);
        let profile: UserProfile = load_or_else(kv, keys::USER_PROFILE, UserProfile::default);
        let routines = load_or_else(kv, keys::DAILY_ROUTINES, Vec::new);
        let onboarded =
            load_or_else(kv, keys::ONBOARDING_DONE, || profile.has_completed_onboarding);

        let mut planner = Self {
            store,
            clock,
            notifier,
            engine,
            day,
            settings,
            profile,
            routines,
            onboarded,
            work: WorkSession::new(),
            dirty: BTreeSet::new(),
            events: Vec::new(),
        };

        planner.reconcile_work_hours();
        if planner.check_rollover().is_none() && !planner.has_schedule_for_today() {
            planner.regenerate_water_schedule();
        }
        planner
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> &DailyData {
        &self.day.daily
    }

    pub fn water_goals(&self) -> &[WaterGoal] {
        &self.day.water_goals
    }

    pub fn water_log(&self) -> &[WaterLogEntry] {
        &self.day.water_log
    }

    /// Archived days, newest first.
    pub fn history(&self) -> &[DailySummary] {
        &self.day.history
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn routines(&self) -> &[DailyRoutine] {
        &self.routines
    }

    pub fn has_completed_onboarding(&self) -> bool {
        self.onboarded
    }

    pub fn work_hours(&self) -> WorkHours {
        self.profile
            .work_hours()
            .or_else(|_| self.settings.work_hours())
            .unwrap_or_default()
    }

    pub fn overdue_tasks(&self) -> Vec<&Task> {
        let now = self.now();
        self.day.daily.tasks.iter().filter(|t| t.is_overdue(now)).collect()
    }

    pub fn overdue_goals(&self) -> Vec<&WaterGoal> {
        let now = self.now();
        self.day.water_goals.iter().filter(|g| g.is_overdue(now)).collect()
    }

    pub fn context(&self) -> MessageContext {
        message::classify(&ContextInput {
            now: self.now(),
            work_hours: self.work_hours(),
            tone: self.profile.tone,
            tasks: &self.day.daily.tasks,
        })
    }

    /// Copy for `category` in the current context, addressed to the user.
    pub fn compose(&self, category: MessageCategory, params: MessageParams) -> Message {
        message::compose(category, self.context(), self.now().date(), &params)
    }

    fn params(&self) -> MessageParams {
        MessageParams::named(self.profile.display_name())
    }

    // ── Rollover and schedule ────────────────────────────────────────

    /// Roll over to a new day if the calendar moved on.
    pub fn check_rollover(&mut self) -> Option<RolloverResult> {
        let now = self.now();
        let result = self
            .engine
            .check(&mut self.day, self.settings.daily_water_goal, now)?;

        for id in &result.retired_task_ids {
            for notification_id in notify::task_ids(id) {
                self.notifier.cancel(&notification_id);
            }
        }
        self.mark(&[
            keys::DAILY_DATA,
            keys::WATER_LOG,
            keys::WATER_GOALS,
            keys::DAILY_HISTORY,
        ]);
        self.events.push(Event::RolledOver {
            from: result.previous_date,
            to: result.new_date,
            archived: result.archived.is_some(),
            carried_over: result.carried_over.len(),
            at: now,
        });

        self.regenerate_water_schedule();
        Some(result)
    }

    fn has_schedule_for_today(&self) -> bool {
        let date = self.day.daily.date;
        !self.day.water_goals.is_empty()
            && self
                .day
                .water_goals
                .iter()
                .all(|g| g.scheduled_time.date() == date)
    }

    /// Replace today's water goals and re-register their notifications.
    ///
    /// A new goal stays completed when a completed goal of the current
    /// schedule has its id or its time and amount, so a drink is never
    /// counted twice.
    pub fn regenerate_water_schedule(&mut self) {
        let now = self.now();
        let hours = self.work_hours();
        let date = self.day.daily.date;

        self.notifier.cancel_all(notify::WATER_PREFIX);
        let mut goals = water::generate_schedule(
            hours.start(),
            hours.end(),
            self.settings.daily_water_goal,
            date,
        );
        let done: Vec<&WaterGoal> = self
            .day
            .water_goals
            .iter()
            .filter(|g| g.is_completed && g.scheduled_time.date() == date)
            .collect();
        for goal in &mut goals {
            goal.is_completed = done.iter().any(|old| {
                old.id == goal.id
                    || (old.scheduled_time == goal.scheduled_time && old.amount == goal.amount)
            });
        }
        self.day.water_goals = goals;
        for goal in &self.day.water_goals {
            self.plan_goal(goal);
        }

        self.mark(&[keys::WATER_GOALS]);
        self.events.push(Event::ScheduleRegenerated {
            date,
            goals: self.day.water_goals.len(),
            at: now,
        });
    }

    fn plan_goal(&self, goal: &WaterGoal) {
        let params = self.params().with_amount(goal.amount);
        let reminder = self.compose(MessageCategory::WaterReminder, params.clone());
        let overdue = self.compose(MessageCategory::OverdueWater, params);
        for request in notify::plan_water_goal(goal, self.now(), reminder, overdue) {
            self.notifier.schedule_at(request);
        }
    }

    fn plan_task_reminder(&self, task: &Task) {
        let category = if task.routine_id.is_some() {
            MessageCategory::DailyRoutine
        } else {
            MessageCategory::TaskReminder
        };
        let params = self.params().with_task(task.title.clone());
        let reminder = self.compose(category, params.clone());
        let overdue = self.compose(MessageCategory::OverdueTask, params);
        for request in notify::plan_task(task, self.now(), reminder, overdue) {
            self.notifier.schedule_at(request);
        }
    }

    fn cancel_task_reminder(&self, task_id: &str) {
        for id in notify::task_ids(task_id) {
            self.notifier.cancel(&id);
        }
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Add a task for today. Blank titles are ignored.
    pub fn add_task(&mut self, title: &str, at: Option<NaiveTime>) -> Option<Task> {
        let now = self.now();
        let scheduled = at.map(|t| self.day.daily.at(t));
        let Some(task) = Task::new(title, scheduled, now) else {
            tracing::debug!("ignored task with blank title");
            return None;
        };

        self.plan_task_reminder(&task);
        self.day.daily.tasks.push(task.clone());
        self.mark(&[keys::DAILY_DATA]);
        self.events.push(Event::TaskAdded {
            task_id: task.id.clone(),
            at: now,
        });
        Some(task)
    }

    /// Flip completion. Returns the new state, `None` for an unknown id.
    ///
    /// Completing cancels the task's pending reminder; reopening plans it
    /// again if its time is still ahead.
    pub fn toggle_task(&mut self, id: &str) -> Option<bool> {
        let now = self.now();
        let task = self.day.daily.task_mut(id)?;
        task.is_completed = !task.is_completed;
        task.completed_at = task.is_completed.then_some(now);
        let task = task.clone();

        let message = if task.is_completed {
            self.cancel_task_reminder(&task.id);
            Some(self.compose(
                MessageCategory::TaskCompletion,
                self.params().with_task(task.title.clone()),
            ))
        } else {
            self.plan_task_reminder(&task);
            None
        };

        self.mark(&[keys::DAILY_DATA]);
        self.events.push(Event::TaskToggled {
            task_id: task.id,
            completed: task.is_completed,
            message,
            at: now,
        });
        Some(task.is_completed)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let Some(index) = self.day.daily.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let task = self.day.daily.tasks.remove(index);
        self.cancel_task_reminder(&task.id);
        self.mark(&[keys::DAILY_DATA]);
        self.events.push(Event::TaskDeleted {
            task_id: task.id,
            at: self.now(),
        });
        true
    }

    /// Change a task's title. Blank titles are ignored.
    pub fn rename_task(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(task) = self.day.daily.task_mut(id) else {
            return false;
        };
        task.title = title.to_string();
        let task = task.clone();
        self.after_task_edit(&task);
        true
    }

    /// Move (or clear) a task's reminder time.
    pub fn reschedule_task(&mut self, id: &str, at: Option<NaiveTime>) -> bool {
        let scheduled = at.map(|t| self.day.daily.at(t));
        let Some(task) = self.day.daily.task_mut(id) else {
            return false;
        };
        task.scheduled_time = scheduled;
        let task = task.clone();
        self.after_task_edit(&task);
        true
    }

    fn after_task_edit(&mut self, task: &Task) {
        self.cancel_task_reminder(&task.id);
        self.plan_task_reminder(task);
        self.mark(&[keys::DAILY_DATA]);
        self.events.push(Event::TaskUpdated {
            task_id: task.id.clone(),
            at: self.now(),
        });
    }

    pub fn set_notes(&mut self, notes: &str) {
        if self.day.daily.notes == notes {
            return;
        }
        self.day.daily.notes = notes.to_string();
        self.mark(&[keys::DAILY_DATA]);
        self.events.push(Event::NotesChanged { at: self.now() });
    }

    // ── Water ────────────────────────────────────────────────────────

    /// Record a drink. Zero amounts are ignored.
    pub fn log_water(&mut self, amount: u32) -> Option<WaterLogEntry> {
        let now = self.now();
        let Some(entry) = WaterLogEntry::new(amount, now) else {
            tracing::debug!("ignored zero water amount");
            return None;
        };
        self.record_drink(entry.clone());
        Some(entry)
    }

    fn record_drink(&mut self, entry: WaterLogEntry) {
        self.day.daily.water_intake = self.day.daily.water_intake.saturating_add(entry.amount);
        self.events.push(Event::WaterLogged {
            entry_id: entry.id.clone(),
            amount: entry.amount,
            total: self.day.daily.water_intake,
            at: entry.timestamp,
        });
        self.day.water_log.push(entry);
        self.mark(&[keys::DAILY_DATA, keys::WATER_LOG]);
    }

    /// Flip a water goal. Returns the new state, `None` for an unknown id.
    ///
    /// Completing logs the goal's amount as a drink and cancels its
    /// reminders. Reopening leaves the logged drink in place.
    pub fn toggle_water_goal(&mut self, id: &str) -> Option<bool> {
        let now = self.now();
        let goal = self.day.water_goals.iter_mut().find(|g| g.id == id)?;
        goal.is_completed = !goal.is_completed;
        let (completed, amount, goal_id) = (goal.is_completed, goal.amount, goal.id.clone());

        if completed {
            for notification_id in notify::water_ids(&goal_id) {
                self.notifier.cancel(&notification_id);
            }
            if let Some(entry) = WaterLogEntry::new(amount, now) {
                self.record_drink(entry);
            }
        }

        self.mark(&[keys::WATER_GOALS]);
        self.events.push(Event::WaterGoalToggled {
            goal_id,
            completed,
            at: now,
        });
        Some(completed)
    }

    // ── Settings and profile ─────────────────────────────────────────

    /// Make settings and profile agree on work hours, preferring the profile.
    fn reconcile_work_hours(&mut self) {
        let hours = self.work_hours();
        let settings_match = self.settings.work_start_hour == hours.start()
            && self.settings.work_end_hour == hours.end();
        let profile_match = self.profile.work_start_hour == hours.start()
            && self.profile.work_end_hour == hours.end();
        if settings_match && profile_match {
            return;
        }
        tracing::warn!(
            start = hours.start(),
            end = hours.end(),
            "settings and profile disagreed on work hours"
        );
        self.apply_work_hours(hours);
    }

    fn apply_work_hours(&mut self, hours: WorkHours) {
        self.settings.work_start_hour = hours.start();
        self.settings.work_end_hour = hours.end();
        self.profile.work_start_hour = hours.start();
        self.profile.work_end_hour = hours.end();
        self.mark(&[keys::APP_SETTINGS, keys::USER_PROFILE]);
    }

    /// Replace the settings. Work hours are mirrored into the profile and a
    /// change of hours regenerates today's water schedule.
    pub fn update_settings(&mut self, settings: AppSettings) -> Result<(), ValidationError> {
        settings.validate()?;
        let hours = settings.work_hours()?;
        let hours_changed = hours != self.work_hours();

        self.settings = settings;
        self.apply_work_hours(hours);
        self.events.push(Event::SettingsChanged { at: self.now() });

        if hours_changed {
            self.regenerate_water_schedule();
        }
        Ok(())
    }

    /// Replace the profile. Work hours are mirrored into the settings and a
    /// change of hours regenerates today's water schedule.
    pub fn update_profile(&mut self, mut profile: UserProfile) -> Result<(), ValidationError> {
        let hours = profile.work_hours()?;
        let hours_changed = hours != self.work_hours();

        profile.nickname = profile.nickname.trim().to_string();
        self.onboarded = self.onboarded || profile.has_completed_onboarding;
        profile.has_completed_onboarding = self.onboarded;
        self.profile = profile;
        self.apply_work_hours(hours);
        self.mark(&[keys::ONBOARDING_DONE]);
        self.events.push(Event::ProfileChanged { at: self.now() });

        if hours_changed {
            self.regenerate_water_schedule();
        }
        Ok(())
    }

    pub fn complete_onboarding(&mut self, mut profile: UserProfile) -> Result<(), ValidationError> {
        profile.has_completed_onboarding = true;
        self.update_profile(profile)
    }

    // ── Routines ─────────────────────────────────────────────────────

    pub fn add_routine(&mut self, title: &str, hour: u32, minute: u32) -> Option<DailyRoutine> {
        let routine = DailyRoutine::new(title, hour, minute)?;
        self.routines.push(routine.clone());
        self.routines_changed();
        Some(routine)
    }

    pub fn remove_routine(&mut self, id: &str) -> bool {
        let before = self.routines.len();
        self.routines.retain(|r| r.id != id);
        if self.routines.len() == before {
            return false;
        }
        self.routines_changed();
        true
    }

    pub fn set_routine_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(routine) = self.routines.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if routine.is_enabled != enabled {
            routine.is_enabled = enabled;
            self.routines_changed();
        }
        true
    }

    fn routines_changed(&mut self) {
        self.mark(&[keys::DAILY_ROUTINES]);
        self.events.push(Event::RoutinesChanged { at: self.now() });
    }

    /// Put today's enabled routines on the task list.
    ///
    /// A routine is skipped when today already has a task from it or a task
    /// with the same title.
    pub fn apply_routines(&mut self) -> Vec<Task> {
        let now = self.now();
        let date = self.day.daily.date;
        let mut added: Vec<Task> = Vec::new();

        for routine in self.routines.iter().filter(|r| r.is_enabled) {
            let exists = self
                .day
                .daily
                .tasks
                .iter()
                .chain(added.iter())
                .any(|t| {
                    t.routine_id.as_deref() == Some(routine.id.as_str())
                        || t.title.eq_ignore_ascii_case(&routine.title)
                });
            if exists {
                continue;
            }
            if let Some(task) = routine.to_task(date, now) {
                added.push(task);
            }
        }

        if added.is_empty() {
            return added;
        }
        for task in &added {
            self.plan_task_reminder(task);
        }
        self.day.daily.tasks.extend(added.iter().cloned());
        self.mark(&[keys::DAILY_DATA]);
        self.events.push(Event::RoutinesApplied {
            added: added.len(),
            at: now,
        });
        added
    }

    // ── Work session and notification actions ────────────────────────

    /// Advance the work-session tracker and announce any due cues.
    pub fn work_tick(&mut self) -> Vec<WorkCue> {
        let now = self.now();
        let hours = self.work_hours();
        let cues = self
            .work
            .tick(now, hours, self.settings.reminder_interval_minutes);

        for cue in &cues {
            let message = self.compose(cue.category(), self.params());
            self.notifier.schedule_at(NotificationRequest {
                id: format!("work-{cue}-{}", now.format("%Y%m%d-%H%M")),
                fire_at: now,
                title: message.title,
                body: message.body,
                category: NotificationCategory::General,
            });
            self.events.push(Event::WorkCue { cue: *cue, at: now });
        }
        cues
    }

    /// Apply a user's response to a delivered notification.
    ///
    /// Returns `false` when the notification no longer refers to anything
    /// actionable (unknown id, already completed).
    pub fn handle_action(&mut self, action: NotificationAction, notification_id: &str) -> bool {
        let now = self.now();
        match (action, notify::parse_target(notification_id)) {
            (NotificationAction::MarkDrunk, Some(NotificationTarget::WaterGoal(goal_id))) => {
                let open = self
                    .day
                    .water_goals
                    .iter()
                    .any(|g| g.id == goal_id && !g.is_completed);
                open && self.toggle_water_goal(&goal_id) == Some(true)
            }
            (NotificationAction::Snooze, Some(target)) => {
                let Some(request) = self.snooze_request(notification_id, &target) else {
                    return false;
                };
                let snoozed = request.snoozed(now);
                if snoozed.id != notification_id {
                    self.notifier.cancel(notification_id);
                }
                self.events.push(Event::NotificationSnoozed {
                    notification_id: snoozed.id.clone(),
                    at: now,
                });
                self.notifier.schedule_at(snoozed);
                true
            }
            _ => false,
        }
    }

    fn snooze_request(
        &self,
        notification_id: &str,
        target: &NotificationTarget,
    ) -> Option<NotificationRequest> {
        let overdue = notify::is_overdue_id(notification_id);
        let (category, message) = match target {
            NotificationTarget::WaterGoal(goal_id) => {
                let goal = self
                    .day
                    .water_goals
                    .iter()
                    .find(|g| &g.id == goal_id && !g.is_completed)?;
                let copy = if overdue {
                    MessageCategory::OverdueWater
                } else {
                    MessageCategory::WaterReminder
                };
                (
                    NotificationCategory::WaterReminder,
                    self.compose(copy, self.params().with_amount(goal.amount)),
                )
            }
            NotificationTarget::Task(task_id) => {
                let task = self.day.daily.task(task_id).filter(|t| !t.is_completed)?;
                let copy = if overdue {
                    MessageCategory::OverdueTask
                } else {
                    MessageCategory::TaskReminder
                };
                (
                    NotificationCategory::TaskReminder,
                    self.compose(copy, self.params().with_task(task.title.clone())),
                )
            }
        };
        Some(NotificationRequest {
            id: notification_id.to_string(),
            fire_at: self.now(),
            title: message.title,
            body: message.body,
            category,
        })
    }

    // ── Persistence and events ───────────────────────────────────────

    fn mark(&mut self, keys: &[&'static str]) {
        self.dirty.extend(keys.iter().copied());
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Write every changed record. Failures are logged and dropped.
    ///
    /// Returns the number of records written.
    pub fn flush(&mut self) -> usize {
        let dirty = std::mem::take(&mut self.dirty);
        let mut written = 0;
        for key in dirty {
            match self.write_key(key) {
                Ok(()) => written += 1,
                Err(e) => tracing::error!(key, error = %e, "failed to persist record"),
            }
        }
        written
    }

    /// Mark every key dirty and flush.
    pub fn save_all(&mut self) -> usize {
        self.mark(&keys::ALL);
        self.flush()
    }

    fn write_key(&self, key: &str) -> Result<(), StoreError> {
        let store = self.store.as_ref();
        match key {
            keys::DAILY_DATA => write_json(store, key, &self.day.daily),
            keys::WATER_LOG => write_json(store, key, &self.day.water_log),
            keys::WATER_GOALS => write_json(store, key, &self.day.water_goals),
            keys::APP_SETTINGS => write_json(store, key, &self.settings),
            keys::DAILY_HISTORY => write_json(store, key, &self.day.history),
            keys::USER_PROFILE => write_json(store, key, &self.profile),
            keys::ONBOARDING_DONE => write_json(store, key, &self.onboarded),
            keys::DAILY_ROUTINES => write_json(store, key, &self.routines),
            other => {
                tracing::warn!(key = other, "no record for key");
                Ok(())
            }
        }
    }

    /// Drain events produced since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
