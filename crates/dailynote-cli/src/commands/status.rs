use dailynote_core::Config;
use serde_json::json;

use crate::common::{print_json, CliResult, Session};

pub fn run(config: &Config, json: bool) -> CliResult {
    let session = Session::open(config)?;
    let planner = &session.planner;
    let now = planner.now();
    let today = planner.today();
    let settings = planner.settings();
    let next_goal = planner
        .water_goals()
        .iter()
        .find(|g| !g.is_completed && g.scheduled_time >= now);

    if json {
        print_json(&json!({
            "date": today.date,
            "greeting": planner.profile().display_name(),
            "context": planner.context(),
            "tasks": {
                "total": today.tasks.len(),
                "completed": today.completed_count(),
                "overdue": planner.overdue_tasks().len(),
            },
            "water": {
                "intake": today.water_intake,
                "goal": settings.daily_water_goal,
                "overdue_goals": planner.overdue_goals().len(),
                "next_goal": next_goal,
            },
            "has_notes": !today.notes.is_empty(),
            "onboarded": planner.has_completed_onboarding(),
        }))?;
    } else {
        let hours = planner.work_hours();
        println!(
            "{}  (work {:02}:00-{:02}:00, {:?})",
            today.date.format("%A %Y-%m-%d"),
            hours.start(),
            hours.end(),
            planner.context()
        );
        println!(
            "Tasks: {}/{} done, {} overdue",
            today.completed_count(),
            today.tasks.len(),
            planner.overdue_tasks().len()
        );
        println!(
            "Water: {} / {} ml, {} goal(s) overdue",
            today.water_intake,
            settings.daily_water_goal,
            planner.overdue_goals().len()
        );
        if let Some(goal) = next_goal {
            println!(
                "Next:  {} {} ml ({})",
                goal.scheduled_time.format("%H:%M"),
                goal.amount,
                goal.label
            );
        }
        if !planner.has_completed_onboarding() {
            println!("Run `dailynote onboard` to set your name and work hours.");
        }
    }

    session.close()
}
