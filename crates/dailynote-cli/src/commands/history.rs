use dailynote_core::Config;

use crate::common::{print_json, CliResult, Session};

pub fn run(config: &Config, limit: Option<usize>, json: bool) -> CliResult {
    let session = Session::open(config)?;
    let history = session.planner.history();
    let shown = &history[..limit.unwrap_or(history.len()).min(history.len())];

    if json {
        print_json(shown)?;
    } else if shown.is_empty() {
        println!("No archived days yet.");
    } else {
        for day in shown {
            println!(
                "{}  tasks {}/{} ({:.0}%)  water {}/{} ml ({:.0}%)",
                day.date,
                day.completed_tasks,
                day.total_tasks,
                day.completion_rate() * 100.0,
                day.water_intake,
                day.water_goal,
                day.water_progress() * 100.0
            );
        }
    }

    session.close()
}
