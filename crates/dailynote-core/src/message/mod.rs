//! Notification copy: context classification and day-indexed rotation.
//!
//! Copy is chosen in two steps. [`classify`] reduces the current situation to
//! a [`MessageContext`]; [`compose`] looks up the variants for a
//! [`MessageCategory`] in that context and picks one by day of year, so the
//! same day always reads the same and consecutive days rotate.

mod catalog;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::{hour_of_day, is_weekend};
use crate::model::{Task, Tone, WorkHours};

/// Stress score at or above which the stressed set is used.
pub const STRESSED_THRESHOLD: f64 = 0.7;
/// Stress score below which the relaxed set is used.
pub const RELAXED_THRESHOLD: f64 = 0.3;
/// More incomplete tasks than this counts as overload.
pub const OVERLOAD_TASKS: usize = 5;
/// Hours before work end that count as "late in the day".
pub const LATE_WINDOW_HOURS: f64 = 2.0;

/// How pressed the user appears to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageContext {
    Relaxed,
    Neutral,
    Stressed,
}

/// What a piece of copy is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    WaterReminder,
    OverdueWater,
    TaskReminder,
    OverdueTask,
    WorkStart,
    WorkEnd,
    DailyRoutine,
    TaskCompletion,
    BreakReminder,
}

/// Rendered title and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub title: String,
    pub body: String,
}

/// Values substituted into `{name}`, `{amount}` and `{task}`.
#[derive(Debug, Clone, Default)]
pub struct MessageParams {
    pub name: String,
    pub amount: Option<u32>,
    pub task: Option<String>,
}

impl MessageParams {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }
}

/// Pick a variant by day of year: `(ordinal % 3) % len`.
///
/// Returns `None` only for an empty list.
pub fn select_variant<T>(variants: &[T], date: NaiveDate) -> Option<&T> {
    select_by_ordinal(variants, date.ordinal())
}

/// [`select_variant`] for a raw day-of-year number.
pub fn select_by_ordinal<T>(variants: &[T], day_of_year: u32) -> Option<&T> {
    if variants.is_empty() {
        return None;
    }
    let index = (day_of_year % 3) as usize % variants.len();
    variants.get(index)
}

/// Inputs to [`classify`].
#[derive(Debug, Clone)]
pub struct ContextInput<'a> {
    pub now: NaiveDateTime,
    pub work_hours: WorkHours,
    pub tone: Tone,
    pub tasks: &'a [Task],
}

/// Weighted load of the day, 0.0 ..= 1.0.
///
/// - 0.3 × share of tasks still open
/// - 0.15 per overdue task, capped at 0.3
/// - 0.2 when more than [`OVERLOAD_TASKS`] are open
/// - 0.2 within [`LATE_WINDOW_HOURS`] of work end
pub fn stress_score(input: &ContextInput<'_>) -> f64 {
    let total = input.tasks.len();
    let incomplete = input.tasks.iter().filter(|t| !t.is_completed).count();
    let overdue = input.tasks.iter().filter(|t| t.is_overdue(input.now)).count();

    let mut score = 0.0;
    if total > 0 {
        score += 0.3 * incomplete as f64 / total as f64;
    }
    score += (0.15 * overdue as f64).min(0.3);
    if incomplete > OVERLOAD_TASKS {
        score += 0.2;
    }
    let hours_left = f64::from(input.work_hours.end()) - hour_of_day(input.now);
    if hours_left > 0.0 && hours_left <= LATE_WINDOW_HOURS {
        score += 0.2;
    }
    score.min(1.0)
}

/// Classify the current situation.
///
/// Weekends and time outside work hours are relaxed. Within work hours the
/// harsh tone reads as stressed, and everything else is graded by
/// [`stress_score`].
pub fn classify(input: &ContextInput<'_>) -> MessageContext {
    let off_hours = !input.work_hours.contains_hour(hour_of_day(input.now));
    if is_weekend(input.now.date()) || off_hours {
        return MessageContext::Relaxed;
    }
    let score = stress_score(input);
    if score >= STRESSED_THRESHOLD || input.tone == Tone::Harsh {
        MessageContext::Stressed
    } else if score < RELAXED_THRESHOLD {
        MessageContext::Relaxed
    } else {
        MessageContext::Neutral
    }
}

/// Render copy for `category` in `context` on `date`.
pub fn compose(
    category: MessageCategory,
    context: MessageContext,
    date: NaiveDate,
    params: &MessageParams,
) -> Message {
    let variants = catalog::variants(category, context);
    let (title, body) = select_variant(variants, date)
        .copied()
        .unwrap_or(catalog::FALLBACK);
    Message {
        title: render(title, params),
        body: render(body, params),
    }
}

fn render(template: &str, params: &MessageParams) -> String {
    let amount = params.amount.map(|a| a.to_string()).unwrap_or_default();
    let task = params.task.as_deref().unwrap_or("your task");
    template
        .replace("{name}", &params.name)
        .replace("{amount}", &amount)
        .replace("{task}", task)
}
