//! Wall-clock source and calendar-day rules.
//!
//! All times in the tracker are local wall-clock `NaiveDateTime`s. The clock is
//! injected so tests (and the CLI's `--now` flag) can pin "now".

use std::sync::Mutex;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Supplies the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The real local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Rule deciding which calendar day an instant belongs to.
///
/// With `hour = 0` the day flips at local midnight. With `hour = 4`, 02:30 on
/// the 12th still counts as the 11th.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DayBoundary {
    pub hour: u32,
}

impl DayBoundary {
    pub const MIDNIGHT: DayBoundary = DayBoundary { hour: 0 };

    /// Boundary at `hour`, clamped into 0..=23.
    pub fn at_hour(hour: u32) -> Self {
        Self { hour: hour.min(23) }
    }

    pub fn day_of(&self, at: NaiveDateTime) -> NaiveDate {
        (at - Duration::hours(i64::from(self.hour))).date()
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Fractional hour of day, e.g. 16:30 -> 16.5.
pub fn hour_of_day(at: NaiveDateTime) -> f64 {
    f64::from(at.hour()) + f64::from(at.minute()) / 60.0
}
