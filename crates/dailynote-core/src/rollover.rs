//! Day-boundary rollover.
//!
//! When the stored day no longer matches the calendar day of "now", the
//! outgoing day is archived, its open tasks move to the new day and the water
//! state is reset.
//!
//! # Usage
//! ```rust,ignore
//! use dailynote_core::rollover::{RolloverEngine, RolloverPolicy};
//!
//! let engine = RolloverEngine::with_policy(RolloverPolicy::default());
//! if let Some(result) = engine.check(&mut state, 2000, now) {
//!     // regenerate the water schedule for result.new_date
//! }
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::DayBoundary;
use crate::model::{
    push_history, DailyData, DailySummary, Task, WaterGoal, WaterLogEntry, HISTORY_LIMIT,
};

/// The records that change at a day boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayState {
    pub daily: DailyData,
    pub water_log: Vec<WaterLogEntry>,
    pub water_goals: Vec<WaterGoal>,
    /// Newest first.
    pub history: Vec<DailySummary>,
}

impl DayState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            daily: DailyData::new(date),
            water_log: Vec::new(),
            water_goals: Vec::new(),
            history: Vec::new(),
        }
    }
}

/// Policy for rolling one day into the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverPolicy {
    /// Which hour starts a new day
    pub boundary: DayBoundary,
    /// Archived days kept in history
    pub history_limit: usize,
}

impl Default for RolloverPolicy {
    fn default() -> Self {
        Self {
            boundary: DayBoundary::MIDNIGHT,
            history_limit: HISTORY_LIMIT,
        }
    }
}

impl RolloverPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the day boundary
    pub fn with_boundary(mut self, boundary: DayBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set how many summaries to keep, never more than [`HISTORY_LIMIT`]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.min(HISTORY_LIMIT);
        self
    }
}

/// What a rollover did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverResult {
    pub previous_date: NaiveDate,
    pub new_date: NaiveDate,
    /// Summary written for the outgoing day, if it had any activity
    pub archived: Option<DailySummary>,
    /// Fresh copies of the outgoing day's open tasks, in original order
    pub carried_over: Vec<Task>,
    /// Tasks of the outgoing day, for cancelling their reminders
    pub retired_task_ids: Vec<String>,
}

/// Detects day changes and performs the rollover
#[derive(Debug, Clone, Default)]
pub struct RolloverEngine {
    policy: RolloverPolicy,
}

impl RolloverEngine {
    /// Create a new engine with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new engine with a custom policy
    pub fn with_policy(policy: RolloverPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RolloverPolicy {
        &self.policy
    }

    /// The calendar day `now` belongs to under this policy
    pub fn day_of(&self, now: NaiveDateTime) -> NaiveDate {
        self.policy.boundary.day_of(now)
    }

    /// Roll `state` forward if `now` is on a later day.
    ///
    /// Returns `None` when nothing changed. Calling again for the same day is
    /// a no-op, and a clock that moved backwards never rolls.
    pub fn check(
        &self,
        state: &mut DayState,
        water_goal_ml: u32,
        now: NaiveDateTime,
    ) -> Option<RolloverResult> {
        let today = self.day_of(now);
        let previous_date = state.daily.date;

        if today == previous_date {
            return None;
        }
        if today < previous_date {
            tracing::warn!(
                stored = %previous_date,
                %today,
                "clock is behind the stored day, skipping rollover"
            );
            return None;
        }

        let outgoing = std::mem::replace(&mut state.daily, DailyData::new(today));

        let archived = if outgoing.is_empty() {
            None
        } else {
            let summary = DailySummary::from_day(&outgoing, water_goal_ml, now);
            push_history(&mut state.history, summary.clone());
            state.history.truncate(self.policy.history_limit);
            Some(summary)
        };

        let carried_over: Vec<Task> = outgoing
            .tasks
            .iter()
            .filter(|t| !t.is_completed)
            .map(|t| t.carried_over(now))
            .collect();

        state.daily = DailyData::with_tasks(today, carried_over.clone());
        state.water_log.clear();
        state.water_goals.clear();

        tracing::info!(
            from = %previous_date,
            to = %today,
            archived = archived.is_some(),
            carried = carried_over.len(),
            "rolled over to a new day"
        );

        Some(RolloverResult {
            previous_date,
            new_date: today,
            archived,
            carried_over,
            retired_task_ids: outgoing.tasks.into_iter().map(|t| t.id).collect(),
        })
    }
}
