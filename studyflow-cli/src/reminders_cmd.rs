use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;

use studyflow_core::{ReminderIntent, ReminderPolicy, project_task_reminders};
use studyflow_store::{Store, TaskFilter};

use crate::state::Profile;

#[derive(Subcommand, Debug)]
pub enum RemindersCommand {
    /// Project upcoming reminders from open tasks with deadlines
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

pub fn run(cmd: RemindersCommand, store: &mut dyn Store, profile: &Profile) -> Result<()> {
    match cmd {
        RemindersCommand::List { limit } => list(store, profile, limit),
    }
}

fn list(store: &mut dyn Store, profile: &Profile, limit: usize) -> Result<()> {
    let now = Utc::now();
    let tasks = store.list_tasks(&profile.user, &TaskFilter::default())?;

    let mut intents: Vec<ReminderIntent> = tasks
        .iter()
        .filter(|t| t.status.is_schedulable())
        .flat_map(|t| project_task_reminders(t, now, ReminderPolicy::default()))
        .collect();
    intents.sort_by_key(|i| i.send_at_utc);
    intents.truncate(limit);

    if intents.is_empty() {
        println!("No upcoming reminders.");
        return Ok(());
    }

    for i in &intents {
        println!(
            "{}  {} ({})",
            i.send_at_utc.format("%Y-%m-%d %H:%M UTC"),
            i.title,
            i.task_id
        );
    }
    Ok(())
}
