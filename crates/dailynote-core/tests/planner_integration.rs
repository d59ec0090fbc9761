//! Integration tests for the planner over a real file store.
//!
//! Walks a user through a couple of days: tasks, water, a rollover and a
//! restart from disk.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use dailynote_core::notify::{self, NotificationAction};
use dailynote_core::storage::keys;
use dailynote_core::{
    Clock, DayBoundary, Event, FixedClock, JsonFileStore, KeyValueStore, MemorySink, Planner,
    RolloverPolicy, Tone, UserProfile,
};
use tempfile::TempDir;

// 2025-03-10 is a Monday
fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

struct Host {
    _dir: TempDir,
    store: Arc<JsonFileStore>,
    clock: Arc<FixedClock>,
    sink: Arc<MemorySink>,
}

impl Host {
    fn new(now: NaiveDateTime) -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::open(dir.path().join("data")).unwrap());
        Self {
            _dir: dir,
            store,
            clock: Arc::new(FixedClock::new(now)),
            sink: Arc::new(MemorySink::new()),
        }
    }

    fn open(&self, policy: RolloverPolicy) -> Planner {
        Planner::load(
            self.store.clone(),
            self.clock.clone(),
            self.sink.clone(),
            policy,
        )
    }
}

#[test]
fn test_two_day_workflow() {
    let host = Host::new(at(10, 8, 30));
    let mut planner = host.open(RolloverPolicy::default());

    planner
        .complete_onboarding(UserProfile {
            nickname: "Kai".into(),
            ..UserProfile::default()
        })
        .unwrap();

    let report = planner.add_task("Quarterly report", Some(hm(16, 0))).unwrap();
    let call = planner.add_task("Call plumber", Some(hm(10, 0))).unwrap();
    planner.add_task("Tidy desk", None).unwrap();
    planner.set_notes("Office closes early");

    host.clock.set(at(10, 10, 5));
    planner.toggle_task(&call.id).unwrap();
    planner.log_water(200).unwrap();
    let first_goal = planner.water_goals()[0].id.clone();
    planner.toggle_water_goal(&first_goal).unwrap();
    assert_eq!(planner.today().water_intake, 500);
    planner.flush();

    // Restart the next morning
    host.clock.set(at(11, 7, 45));
    let mut planner = host.open(RolloverPolicy::default());
    assert!(planner.has_completed_onboarding());
    assert_eq!(planner.profile().nickname, "Kai");

    let summary = &planner.history()[0];
    assert_eq!(summary.date, at(10, 0, 0).date());
    assert_eq!(summary.total_tasks, 3);
    assert_eq!(summary.completed_tasks, 1);
    assert_eq!(summary.water_intake, 500);
    assert_eq!(summary.completed_task_details[0].title, "Call plumber");

    let titles: Vec<_> = planner.today().tasks.iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles, vec!["Quarterly report", "Tidy desk"]);
    assert!(planner.today().tasks.iter().all(|t| t.id != report.id));
    assert!(planner.today().notes.is_empty());
    assert_eq!(planner.today().water_intake, 0);
    assert!(planner.water_log().is_empty());
    assert!(planner
        .water_goals()
        .iter()
        .all(|g| g.scheduled_time.date() == at(11, 0, 0).date()));
    assert!(!host.sink.contains(&notify::task_id(&report.id)));

    let events = planner.take_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::RolledOver { archived: true, carried_over: 2, .. })));

    assert_eq!(planner.save_all(), keys::ALL.len());
    for key in keys::ALL {
        assert!(host.store.get(key).unwrap().is_some(), "missing {key}");
    }
}

#[test]
fn test_late_boundary_keeps_night_owl_on_same_day() {
    let host = Host::new(at(10, 22, 0));
    let policy = RolloverPolicy::new().with_boundary(DayBoundary::at_hour(4));
    let mut planner = host.open(policy);
    planner.add_task("Finish chapter", None).unwrap();
    planner.flush();

    host.clock.set(at(11, 2, 30));
    let mut planner = host.open(policy);
    assert_eq!(planner.today().date, at(10, 0, 0).date());
    assert!(planner.history().is_empty());

    host.clock.set(at(11, 4, 0));
    let result = planner.check_rollover().unwrap();
    assert_eq!(result.new_date, at(11, 0, 0).date());
}

#[test]
fn test_notification_actions_round_trip() {
    let host = Host::new(at(10, 8, 0));
    let mut planner = host.open(RolloverPolicy::default());
    let goal = planner.water_goals()[0].clone();

    host.clock.set(goal.scheduled_time);
    let due = host.sink.take_due(host.clock.now());
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, notify::water_id(&goal.id));

    assert!(planner.handle_action(NotificationAction::Snooze, &due[0].id));
    let snoozed = host.sink.get(&format!("{}-snooze", due[0].id)).unwrap();
    assert_eq!(snoozed.fire_at, goal.scheduled_time + Duration::minutes(10));

    assert!(planner.handle_action(NotificationAction::MarkDrunk, &snoozed.id));
    assert!(planner.water_goals()[0].is_completed);
    for id in notify::water_ids(&goal.id) {
        assert!(!host.sink.contains(&id));
    }
}

#[test]
fn test_harsh_tone_changes_copy_context() {
    let host = Host::new(at(10, 10, 0));
    let mut planner = host.open(RolloverPolicy::default());
    assert_eq!(planner.context(), dailynote_core::MessageContext::Relaxed);

    let profile = UserProfile {
        tone: Tone::Harsh,
        ..planner.profile().clone()
    };
    planner.update_profile(profile).unwrap();
    assert_eq!(planner.context(), dailynote_core::MessageContext::Stressed);
}

#[test]
fn test_corrupt_file_loads_defaults() {
    let host = Host::new(at(10, 8, 0));
    host.store.set(keys::DAILY_HISTORY, "{not json").unwrap();
    host.store.set(keys::DAILY_ROUTINES, "42").unwrap();

    let planner = host.open(RolloverPolicy::default());
    assert!(planner.history().is_empty());
    assert!(planner.routines().is_empty());
}
