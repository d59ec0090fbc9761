use clap::{Args, Subcommand};
use dailynote_core::{Config, Tone, UserProfile};

use crate::common::{print_json, CliResult, Session};

#[derive(Args)]
pub struct ProfileArgs {
    /// Name used in reminders
    #[arg(long)]
    pub nickname: Option<String>,
    /// Work start hour (0-23)
    #[arg(long)]
    pub start: Option<u32>,
    /// Work end hour (0-23)
    #[arg(long)]
    pub end: Option<u32>,
    /// Reminder tone: gentle, cheerful or harsh
    #[arg(long)]
    pub tone: Option<String>,
}

impl ProfileArgs {
    fn apply_to(self, mut profile: UserProfile) -> CliResult<UserProfile> {
        if let Some(nickname) = self.nickname {
            profile.nickname = nickname;
        }
        if let Some(start) = self.start {
            profile.work_start_hour = start;
        }
        if let Some(end) = self.end {
            profile.work_end_hour = end;
        }
        if let Some(tone) = self.tone {
            profile.tone = tone.parse::<Tone>()?;
        }
        Ok(profile)
    }
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile
    Show {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Change profile fields
    Set(ProfileArgs),
}

fn print_profile(profile: &UserProfile) {
    println!("Nickname: {}", profile.display_name());
    println!(
        "Work hours: {:02}:00-{:02}:00",
        profile.work_start_hour, profile.work_end_hour
    );
    println!("Tone: {}", profile.tone);
}

pub fn run(action: ProfileAction, config: &Config) -> CliResult {
    let mut session = Session::open(config)?;

    match action {
        ProfileAction::Show { json } => {
            if json {
                print_json(session.planner.profile())?;
            } else {
                print_profile(session.planner.profile());
            }
        }
        ProfileAction::Set(args) => {
            let profile = args.apply_to(session.planner.profile().clone())?;
            session.planner.update_profile(profile)?;
            print_profile(session.planner.profile());
        }
    }

    session.close()
}

pub fn onboard(args: ProfileArgs, config: &Config) -> CliResult {
    let mut session = Session::open(config)?;
    let profile = args.apply_to(session.planner.profile().clone())?;
    session.planner.complete_onboarding(profile)?;

    let greeting = session.planner.profile().display_name().to_string();
    println!("Welcome, {greeting}!");
    print_profile(session.planner.profile());
    println!(
        "{} water goals scheduled for today.",
        session.planner.water_goals().len()
    );

    session.close()
}
