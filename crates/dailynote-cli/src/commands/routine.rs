use chrono::Timelike;
use clap::Subcommand;
use dailynote_core::{Config, ValidationError};

use crate::common::{parse_time, print_json, resolve_id, short_id, CliResult, Session};

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Add a routine
    Add {
        /// Routine title
        title: String,
        /// Daily time (HH:MM)
        #[arg(long)]
        at: String,
    },
    /// List routines
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a routine
    Remove {
        /// Routine ID or unique prefix
        id: String,
    },
    /// Enable a routine
    Enable {
        /// Routine ID or unique prefix
        id: String,
    },
    /// Disable a routine
    Disable {
        /// Routine ID or unique prefix
        id: String,
    },
    /// Add today's enabled routines to the task list
    Apply,
}

fn routine_id(session: &Session, query: &str) -> CliResult<String> {
    let ids = session.planner.routines().iter().map(|r| r.id.as_str());
    Ok(resolve_id(ids, query)?)
}

pub fn run(action: RoutineAction, config: &Config) -> CliResult {
    let mut session = Session::open(config)?;

    match action {
        RoutineAction::Add { title, at } => {
            let at = parse_time(&at)?;
            let routine = session
                .planner
                .add_routine(&title, at.hour(), at.minute())
                .ok_or(ValidationError::EmptyTitle)?;
            println!("Routine added: {}", routine.id);
        }
        RoutineAction::List { json } => {
            let routines = session.planner.routines();
            if json {
                print_json(routines)?;
            } else if routines.is_empty() {
                println!("No routines.");
            } else {
                for r in routines {
                    let state = if r.is_enabled { "on " } else { "off" };
                    println!(
                        "{state}  {}  {:02}:{:02}  {}",
                        short_id(&r.id),
                        r.hour,
                        r.minute,
                        r.title
                    );
                }
            }
        }
        RoutineAction::Remove { id } => {
            let id = routine_id(&session, &id)?;
            session.planner.remove_routine(&id);
            println!("Routine removed: {id}");
        }
        RoutineAction::Enable { id } => {
            let id = routine_id(&session, &id)?;
            session.planner.set_routine_enabled(&id, true);
            println!("Routine enabled: {id}");
        }
        RoutineAction::Disable { id } => {
            let id = routine_id(&session, &id)?;
            session.planner.set_routine_enabled(&id, false);
            println!("Routine disabled: {id}");
        }
        RoutineAction::Apply => {
            let added = session.planner.apply_routines();
            println!("Added {} routine task(s)", added.len());
        }
    }

    session.close()
}
