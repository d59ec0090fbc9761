//! Daily hydration schedule.
//!
//! The schedule is a fixed set of named slots placed relative to the user's
//! work hours. It approximates the daily target rather than partitioning it:
//! the produced amounts rarely sum to exactly `total_goal_ml`.

use chrono::{NaiveDate, NaiveTime};

use crate::model::WaterGoal;

/// A named time slot before it is bound to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub hour: u32,
    pub minute: u32,
    pub amount: u32,
    pub label: &'static str,
}

impl Slot {
    const fn new(hour: u32, minute: u32, amount: u32, label: &'static str) -> Self {
        Self {
            hour,
            minute,
            amount,
            label,
        }
    }
}

/// Slots for the given work bounds, in declaration order (not sorted).
pub fn slots(work_start_hour: u32, work_end_hour: u32) -> Vec<Slot> {
    let start = work_start_hour;
    let end = work_end_hour;
    let work_hours = end.saturating_sub(start);

    let mut slots = vec![
        Slot::new(start, 0, 300, "early hydration"),
        Slot::new(start + (work_hours / 4).max(1), 30, 300, "morning refill"),
        Slot::new((start + work_hours / 2).min(12), 0, 250, "before lunch"),
        Slot::new(13, 30, 300, "after lunch"),
    ];

    if 15 < end {
        slots.push(Slot::new(15, 0, 300, "afternoon boost"));
    }

    let late = 17.min(end.saturating_sub(1));
    if late > 15 && late < end {
        slots.push(Slot::new(late, 0, 300, "late afternoon"));
    }

    if end >= 18 {
        slots.push(Slot::new(end, 0, 250, "wrap-up"));
    }

    slots
}

/// Build the day's water goals, sorted ascending by time.
///
/// Slots that already lie in the past are kept; callers show them as overdue.
/// Goal ids are `YYYYMMDD-NN` so regenerating for the same inputs yields the
/// same ids.
pub fn generate_schedule(
    work_start_hour: u32,
    work_end_hour: u32,
    total_goal_ml: u32,
    today: NaiveDate,
) -> Vec<WaterGoal> {
    let mut timed: Vec<(NaiveTime, Slot)> = slots(work_start_hour, work_end_hour)
        .into_iter()
        .filter_map(|slot| NaiveTime::from_hms_opt(slot.hour, slot.minute, 0).map(|t| (t, slot)))
        .collect();
    timed.sort_by_key(|(time, _)| *time);

    let goals: Vec<WaterGoal> = timed
        .into_iter()
        .enumerate()
        .map(|(index, (time, slot))| WaterGoal {
            id: format!("{}-{:02}", today.format("%Y%m%d"), index),
            label: slot.label.to_string(),
            amount: slot.amount,
            scheduled_time: today.and_time(time),
            is_completed: false,
        })
        .collect();

    let scheduled: u32 = goals.iter().map(|g| g.amount).sum();
    tracing::debug!(
        %today,
        goals = goals.len(),
        scheduled_ml = scheduled,
        target_ml = total_goal_ml,
        "generated water schedule"
    );

    goals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn hm(goal: &WaterGoal) -> (u32, u32) {
        (goal.scheduled_time.hour(), goal.scheduled_time.minute())
    }

    #[test]
    fn nine_to_six_produces_seven_goals() {
        let goals = generate_schedule(9, 18, 2000, day());
        let times: Vec<_> = goals.iter().map(hm).collect();
        assert_eq!(
            times,
            vec![(9, 0), (11, 30), (12, 0), (13, 30), (15, 0), (17, 0), (18, 0)]
        );
        assert_eq!(goals[0].amount, 300);
        assert_eq!(goals[3].amount, 300);
        assert!(goals.iter().all(|g| !g.is_completed));
        assert!(goals.iter().all(|g| g.scheduled_time.date() == day()));
    }

    #[test]
    fn ids_are_deterministic_and_unique() {
        let first = generate_schedule(9, 18, 2000, day());
        let second = generate_schedule(9, 18, 2000, day());
        assert_eq!(first, second);
        assert_eq!(first[0].id, "20250310-00");
        let mut ids: Vec<_> = first.iter().map(|g| g.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), first.len());
    }

    #[test]
    fn short_day_drops_afternoon_slots() {
        // 8-15: no 15:00 slot, no late slot, no wrap-up
        let goals = generate_schedule(8, 15, 2000, day());
        let times: Vec<_> = goals.iter().map(hm).collect();
        assert_eq!(times, vec![(8, 0), (9, 30), (11, 0), (13, 30)]);
    }

    #[test]
    fn sixteen_end_has_no_late_slot() {
        // late = min(17, 15) = 15, not in (15, 16)
        let goals = generate_schedule(9, 16, 2000, day());
        let times: Vec<_> = goals.iter().map(hm).collect();
        assert_eq!(times, vec![(9, 0), (10, 30), (12, 0), (13, 30), (15, 0)]);
    }

    #[test]
    fn seventeen_end_has_late_slot_at_sixteen() {
        let goals = generate_schedule(9, 17, 2000, day());
        let times: Vec<_> = goals.iter().map(hm).collect();
        assert!(times.contains(&(16, 0)));
        assert!(!times.contains(&(17, 0)));
    }

    #[test]
    fn late_end_adds_wrap_up_at_end() {
        let goals = generate_schedule(10, 20, 2000, day());
        let last = goals.last().unwrap();
        assert_eq!(hm(last), (20, 0));
        assert_eq!(last.amount, 250);
    }

    #[test]
    fn short_shift_uses_minimum_one_hour_offset() {
        // 1-hour shift: work_hours/4 == 0, offset is 1
        let goals = generate_schedule(13, 14, 2000, day());
        let times: Vec<_> = goals.iter().map(hm).collect();
        assert!(times.contains(&(14, 30)));
    }

    #[test]
    fn schedule_is_sorted() {
        for (start, end) in [(5, 12), (6, 23), (12, 22), (0, 23), (14, 19)] {
            let goals = generate_schedule(start, end, 2000, day());
            assert!(goals
                .windows(2)
                .all(|w| w[0].scheduled_time <= w[1].scheduled_time));
            assert!(goals.iter().any(|g| hm(g) == (13, 30)));
        }
    }
}
