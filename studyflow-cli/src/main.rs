use anyhow::Result;
use clap::{Parser, Subcommand};

mod checkin_cmd;
mod config;
mod reminders_cmd;
mod schedule_cmd;
mod setup;
mod state;
mod tasks_cmd;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("STUDYFLOW_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "studyflow", version = VERSION, about = "Studyflow student planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One-time interactive setup: write ~/.studyflow/profile.json + config.toml
    Setup,

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: tasks_cmd::TaskCommand,
    },

    /// Generate and inspect daily schedules
    Schedule {
        #[command(subcommand)]
        command: schedule_cmd::ScheduleCommand,
    },

    /// Mental-health check-ins
    Checkin {
        #[command(subcommand)]
        command: checkin_cmd::CheckinCommand,
    },

    /// Deadline reminders projected from open tasks
    Reminders {
        #[command(subcommand)]
        command: reminders_cmd::RemindersCommand,
    },

    /// Write a default config.toml if none exists
    ConfigInit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Setup => setup::run_setup(),
        Command::ConfigInit => config::init_config(),
        Command::Task { command } => with_store(|store, profile| {
            tasks_cmd::run(command, store, profile)
        }),
        Command::Schedule { command } => with_store(|store, profile| {
            schedule_cmd::run(command, store, profile)
        }),
        Command::Checkin { command } => with_store(|store, profile| {
            checkin_cmd::run(command, store, profile)
        }),
        Command::Reminders { command } => with_store(|store, profile| {
            reminders_cmd::run(command, store, profile)
        }),
    }
}

fn with_store<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut dyn studyflow_store::Store, &state::Profile) -> Result<()>,
{
    let profile = state::read_profile()?;
    let cfg = config::load_config()?;
    let mut store = config::open_store(&cfg)?;
    f(store.as_mut(), &profile)
}
