//! Task management commands for CLI.

use clap::Subcommand;
use dailynote_core::{Config, Event, Task, ValidationError};

use crate::common::{parse_time, print_json, resolve_id, short_id, CliResult, Session};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task for today
    Add {
        /// Task title
        title: String,
        /// Reminder time (HH:MM)
        #[arg(long)]
        at: Option<String>,
    },
    /// List today's tasks
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task between done and open
    Done {
        /// Task ID or unique prefix
        id: String,
    },
    /// Rename a task
    Rename {
        /// Task ID or unique prefix
        id: String,
        /// New title
        title: String,
    },
    /// Move or clear a task's reminder time
    Schedule {
        /// Task ID or unique prefix
        id: String,
        /// New time (HH:MM); omit to clear
        at: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID or unique prefix
        id: String,
    },
}

fn task_id(session: &Session, query: &str) -> CliResult<String> {
    let ids = session.planner.today().tasks.iter().map(|t| t.id.as_str());
    Ok(resolve_id(ids, query)?)
}

fn print_task(task: &Task) {
    let mark = if task.is_completed { "x" } else { " " };
    let at = task
        .scheduled_time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "     ".into());
    let routine = if task.routine_id.is_some() { " (routine)" } else { "" };
    println!("[{mark}] {}  {at}  {}{routine}", short_id(&task.id), task.title);
}

pub fn run(action: TaskAction, config: &Config) -> CliResult {
    let mut session = Session::open(config)?;

    match action {
        TaskAction::Add { title, at } => {
            let at = at.as_deref().map(parse_time).transpose()?;
            match session.planner.add_task(&title, at) {
                Some(task) => {
                    println!("Task added: {}", task.id);
                    print_task(&task);
                }
                None => return Err(ValidationError::EmptyTitle.into()),
            }
        }
        TaskAction::List { json } => {
            let tasks = &session.planner.today().tasks;
            if json {
                print_json(tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks for today.");
            } else {
                tasks.iter().for_each(print_task);
            }
        }
        TaskAction::Done { id } => {
            let id = task_id(&session, &id)?;
            session.planner.take_events();
            let completed = session.planner.toggle_task(&id).ok_or("task not found")?;
            if completed {
                println!("Task completed: {id}");
            } else {
                println!("Task reopened: {id}");
            }
            for event in session.planner.take_events() {
                if let Event::TaskToggled {
                    message: Some(message),
                    ..
                } = event
                {
                    println!("{}: {}", message.title, message.body);
                }
            }
        }
        TaskAction::Rename { id, title } => {
            let id = task_id(&session, &id)?;
            if !session.planner.rename_task(&id, &title) {
                return Err(ValidationError::EmptyTitle.into());
            }
            println!("Task renamed: {id}");
        }
        TaskAction::Schedule { id, at } => {
            let id = task_id(&session, &id)?;
            let at = at.as_deref().map(parse_time).transpose()?;
            session.planner.reschedule_task(&id, at);
            println!("Task rescheduled: {id}");
        }
        TaskAction::Delete { id } => {
            let id = task_id(&session, &id)?;
            session.planner.delete_task(&id);
            println!("Task deleted: {id}");
        }
    }

    session.close()
}
