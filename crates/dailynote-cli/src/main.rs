use clap::{CommandFactory, Parser, Subcommand};
use dailynote_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod common;
mod notifier;

#[derive(Parser)]
#[command(name = "dailynote", version, about = "Daily tasks and water tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Today at a glance
    Status {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Today's task list
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Water log and hydration schedule
    Water {
        #[command(subcommand)]
        action: commands::water::WaterAction,
    },
    /// Free-form notes for today
    Notes {
        #[command(subcommand)]
        action: commands::notes::NotesAction,
    },
    /// Archived days, newest first
    History {
        /// Show at most this many days
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Recurring daily tasks
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Nickname, work hours and tone
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// First-run setup
    Onboard(commands::profile::ProfileArgs),
    /// Tracker settings (water goal, reminder interval)
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Host configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Pending notifications
    Notifications {
        #[command(subcommand)]
        action: commands::notifications::NotificationsAction,
    },
    /// Run in the foreground, delivering reminders as they come due
    Run {
        /// Process one round of checks and deliveries, then exit
        #[arg(long)]
        once: bool,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::Status { json } => commands::status::run(&config, json),
        Commands::Task { action } => commands::task::run(action, &config),
        Commands::Water { action } => commands::water::run(action, &config),
        Commands::Notes { action } => commands::notes::run(action, &config),
        Commands::History { limit, json } => commands::history::run(&config, limit, json),
        Commands::Routine { action } => commands::routine::run(action, &config),
        Commands::Profile { action } => commands::profile::run(action, &config),
        Commands::Onboard(args) => commands::profile::onboard(args, &config),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Notifications { action } => commands::notifications::run(action, &config),
        Commands::Run { once } => commands::run::run(&config, once),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "dailynote",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
