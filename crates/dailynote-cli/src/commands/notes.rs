use clap::Subcommand;
use dailynote_core::Config;

use crate::common::{CliResult, Session};

#[derive(Subcommand)]
pub enum NotesAction {
    /// Print today's notes
    Show,
    /// Replace today's notes
    Set {
        /// Note text
        text: Vec<String>,
    },
    /// Clear today's notes
    Clear,
}

pub fn run(action: NotesAction, config: &Config) -> CliResult {
    let mut session = Session::open(config)?;

    match action {
        NotesAction::Show => println!("{}", session.planner.today().notes),
        NotesAction::Set { text } => {
            session.planner.set_notes(&text.join(" "));
            println!("ok");
        }
        NotesAction::Clear => {
            session.planner.set_notes("");
            println!("ok");
        }
    }

    session.close()
}
