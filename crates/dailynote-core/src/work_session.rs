//! Work-day cues driven by a periodic tick.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::{hour_of_day, is_weekend};
use crate::message::MessageCategory;
use crate::model::WorkHours;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkCue {
    WorkStart,
    BreakReminder,
    WorkEnd,
}

impl WorkCue {
    pub fn category(&self) -> MessageCategory {
        match self {
            WorkCue::WorkStart => MessageCategory::WorkStart,
            WorkCue::BreakReminder => MessageCategory::BreakReminder,
            WorkCue::WorkEnd => MessageCategory::WorkEnd,
        }
    }
}

impl fmt::Display for WorkCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkCue::WorkStart => "start",
            WorkCue::BreakReminder => "break",
            WorkCue::WorkEnd => "end",
        };
        f.write_str(s)
    }
}

/// Tracks which cues already fired today.
#[derive(Debug, Clone, Default)]
pub struct WorkSession {
    date: Option<NaiveDate>,
    started: bool,
    ended: bool,
    last_cue_at: Option<NaiveDateTime>,
}

impl WorkSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` and return the cues that became due.
    ///
    /// Weekdays only. `WorkStart` fires once when `now` first falls inside
    /// work hours, `BreakReminder` every `break_interval_minutes` after that,
    /// and `WorkEnd` once when work end is reached after a start.
    pub fn tick(
        &mut self,
        now: NaiveDateTime,
        hours: WorkHours,
        break_interval_minutes: u32,
    ) -> Vec<WorkCue> {
        let today = now.date();
        if self.date != Some(today) {
            *self = Self {
                date: Some(today),
                ..Self::default()
            };
        }
        if is_weekend(today) {
            return Vec::new();
        }

        let hour = hour_of_day(now);
        let mut cues = Vec::new();

        if hours.contains_hour(hour) {
            if !self.started {
                self.started = true;
                self.last_cue_at = Some(now);
                cues.push(WorkCue::WorkStart);
            } else if let Some(last) = self.last_cue_at {
                let interval = Duration::minutes(i64::from(break_interval_minutes.max(1)));
                if now - last >= interval {
                    self.last_cue_at = Some(now);
                    cues.push(WorkCue::BreakReminder);
                }
            }
        } else if hour >= f64::from(hours.end()) && self.started && !self.ended {
            self.ended = true;
            cues.push(WorkCue::WorkEnd);
        }

        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-03-10 is a Monday
    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn hours() -> WorkHours {
        WorkHours::new(9, 18).unwrap()
    }

    #[test]
    fn full_day_sequence() {
        let mut session = WorkSession::new();
        assert!(session.tick(at(10, 8, 0), hours(), 60).is_empty());
        assert_eq!(session.tick(at(10, 9, 0), hours(), 60), vec![WorkCue::WorkStart]);
        assert!(session.tick(at(10, 9, 30), hours(), 60).is_empty());
        assert_eq!(
            session.tick(at(10, 10, 0), hours(), 60),
            vec![WorkCue::BreakReminder]
        );
        assert!(session.tick(at(10, 10, 59), hours(), 60).is_empty());
        assert_eq!(session.tick(at(10, 18, 0), hours(), 60), vec![WorkCue::WorkEnd]);
        assert!(session.tick(at(10, 18, 1), hours(), 60).is_empty());
    }

    #[test]
    fn end_needs_a_start() {
        let mut session = WorkSession::new();
        assert!(session.tick(at(10, 19, 0), hours(), 60).is_empty());
    }

    #[test]
    fn weekend_is_quiet() {
        let mut session = WorkSession::new();
        assert!(session.tick(at(8, 10, 0), hours(), 60).is_empty());
        assert!(session.tick(at(8, 18, 0), hours(), 60).is_empty());
    }

    #[test]
    fn new_day_resets() {
        let mut session = WorkSession::new();
        session.tick(at(10, 9, 0), hours(), 60);
        session.tick(at(10, 18, 0), hours(), 60);
        assert_eq!(session.tick(at(11, 9, 5), hours(), 60), vec![WorkCue::WorkStart]);
    }
}
