use clap::Subcommand;
use dailynote_core::Config;

use crate::common::{print_json, resolve_id, CliResult, Session};

#[derive(Subcommand)]
pub enum WaterAction {
    /// Record a drink
    Log {
        /// Amount in ml
        amount: u32,
    },
    /// Show today's hydration schedule
    Goals {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today's drinks
    History {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a scheduled goal; completing it logs its amount
    Check {
        /// Goal ID (e.g. 20250310-02) or unique prefix
        id: String,
    },
    /// Rebuild today's schedule from the current work hours
    Regenerate,
}

pub fn run(action: WaterAction, config: &Config) -> CliResult {
    let mut session = Session::open(config)?;

    match action {
        WaterAction::Log { amount } => {
            if session.planner.log_water(amount).is_none() {
                return Err("amount must be greater than zero".into());
            }
            println!(
                "Logged {amount} ml, {} / {} ml today",
                session.planner.today().water_intake,
                session.planner.settings().daily_water_goal
            );
        }
        WaterAction::Goals { json } => {
            let goals = session.planner.water_goals();
            if json {
                print_json(goals)?;
            } else {
                let now = session.planner.now();
                for goal in goals {
                    let state = if goal.is_completed {
                        "x"
                    } else if goal.is_overdue(now) {
                        "!"
                    } else {
                        " "
                    };
                    println!(
                        "[{state}] {}  {}  {:>4} ml  {}",
                        goal.id,
                        goal.scheduled_time.format("%H:%M"),
                        goal.amount,
                        goal.label
                    );
                }
            }
        }
        WaterAction::History { json } => {
            let log = session.planner.water_log();
            if json {
                print_json(log)?;
            } else if log.is_empty() {
                println!("Nothing logged today.");
            } else {
                for entry in log {
                    println!("{}  {:>4} ml", entry.timestamp.format("%H:%M"), entry.amount);
                }
            }
        }
        WaterAction::Check { id } => {
            let ids = session.planner.water_goals().iter().map(|g| g.id.as_str());
            let id = resolve_id(ids, &id)?;
            let completed = session
                .planner
                .toggle_water_goal(&id)
                .ok_or("goal not found")?;
            if completed {
                println!(
                    "Goal {id} done, {} ml today",
                    session.planner.today().water_intake
                );
            } else {
                println!("Goal {id} reopened");
            }
        }
        WaterAction::Regenerate => {
            session.planner.regenerate_water_schedule();
            println!(
                "Schedule rebuilt: {} goals",
                session.planner.water_goals().len()
            );
        }
    }

    session.close()
}
