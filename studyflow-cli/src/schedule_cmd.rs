use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;

use studyflow_core::{
    BlockType, Schedule, UserProfile, generate_schedule, today_in_tz,
};
use studyflow_store::Store;

use crate::state::Profile;

#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Generate (or regenerate) the schedule for a date and persist it
    Generate {
        /// Target date YYYY-MM-DD (default: today in your profile timezone)
        #[arg(long)]
        date: Option<String>,
    },

    /// Print the stored schedule for a date
    Show {
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(cmd: ScheduleCommand, store: &mut dyn Store, profile: &Profile) -> Result<()> {
    match cmd {
        ScheduleCommand::Generate { date } => generate(store, profile, date),
        ScheduleCommand::Show { date } => show(store, profile, date),
    }
}

fn resolve_date(profile: &Profile, date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{d}' (expected YYYY-MM-DD)")),
        None => today_in_tz(&profile.timezone),
    }
}

fn generate(store: &mut dyn Store, profile: &Profile, date: Option<String>) -> Result<()> {
    let date = resolve_date(profile, date)?;
    let now = Utc::now();

    let tasks = store.schedulable_tasks(&profile.user, date)?;
    let user_profile = UserProfile {
        name: profile.name.clone(),
        timezone: Some(profile.timezone.clone()),
        wake_hour: None,
    };

    let schedule = generate_schedule(&user_profile, &tasks, date, now);
    store.upsert_schedule(&profile.user, date, &schedule)?;

    println!("# Schedule for {date}\n");
    print_blocks(&schedule);

    // The walk truncates silently; the id diff is how callers report overflow.
    let scheduled = schedule.task_ids();
    let skipped = tasks
        .iter()
        .filter(|t| !scheduled.contains(&t.id.as_str()))
        .count();
    if skipped > 0 {
        println!("\n{skipped} task(s) did not fit before 22:00.");
    }

    Ok(())
}

fn show(store: &mut dyn Store, profile: &Profile, date: Option<String>) -> Result<()> {
    let date = resolve_date(profile, date)?;
    let Some(stored) = store.get_schedule(&profile.user, date)? else {
        bail!("no schedule for {date}. Run: studyflow schedule generate --date {date}");
    };

    println!("# Schedule for {date}\n");
    print_blocks(&stored.schedule);
    Ok(())
}

fn print_blocks(schedule: &Schedule) {
    if schedule.is_empty() {
        println!("(empty - no tasks fit this day)");
        return;
    }

    for b in &schedule.time_blocks {
        let span = format!(
            "{}-{}",
            b.start_time.format("%H:%M"),
            b.end_time.format("%H:%M")
        );
        match b.block_type {
            BlockType::Task => {
                let prio = b.priority.map_or("-".to_string(), |p| p.to_string());
                println!("{span}  task   {} (priority {prio})", b.title);
            }
            BlockType::Break => println!("{span}  break"),
        }
    }
}
