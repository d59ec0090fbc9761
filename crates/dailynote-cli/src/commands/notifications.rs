use clap::{Subcommand, ValueEnum};
use dailynote_core::{Config, NotificationAction};

use crate::common::{print_json, CliResult, Session};
use crate::notifier::render;

#[derive(Clone, Copy, ValueEnum)]
pub enum ActionArg {
    MarkDrunk,
    Snooze,
}

impl From<ActionArg> for NotificationAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::MarkDrunk => NotificationAction::MarkDrunk,
            ActionArg::Snooze => NotificationAction::Snooze,
        }
    }
}

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// List pending notifications
    List {
        /// Only those already due
        #[arg(long)]
        due: bool,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Respond to a notification
    Act {
        /// Notification ID (e.g. water-20250310-02)
        id: String,
        /// Response
        #[arg(value_enum)]
        action: ActionArg,
    },
}

pub fn run(action: NotificationsAction, config: &Config) -> CliResult {
    let mut session = Session::open(config)?;

    match action {
        NotificationsAction::List { due, json } => {
            let now = session.planner.now();
            let pending: Vec<_> = session
                .notifier
                .pending()
                .into_iter()
                .filter(|r| !due || r.fire_at <= now)
                .collect();
            if json {
                print_json(&pending)?;
            } else if pending.is_empty() {
                println!("Nothing pending.");
            } else {
                for request in &pending {
                    println!("{}", render(request));
                }
            }
        }
        NotificationsAction::Act { id, action } => {
            if !session.planner.handle_action(action.into(), &id) {
                return Err(format!("nothing to do for '{id}'").into());
            }
            println!("ok");
        }
    }

    session.close()
}
