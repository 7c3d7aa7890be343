use anyhow::{Result, bail};
use chrono::Utc;
use clap::Subcommand;

use studyflow_core::Checkin;
use studyflow_store::Store;

use crate::state::Profile;

#[derive(Subcommand, Debug)]
pub enum CheckinCommand {
    /// Record a check-in
    Add {
        /// Stress level 1-10
        #[arg(long)]
        stress: Option<i32>,

        #[arg(long)]
        mood: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Aggregates over a trailing window, plus recent check-ins
    Insights {
        /// Window size in days
        #[arg(long, default_value_t = 30)]
        days: i64,
    },
}

pub fn run(cmd: CheckinCommand, store: &mut dyn Store, profile: &Profile) -> Result<()> {
    match cmd {
        CheckinCommand::Add {
            stress,
            mood,
            notes,
        } => add(store, profile, stress, mood, notes),
        CheckinCommand::Insights { days } => insights(store, profile, days),
    }
}

fn add(
    store: &mut dyn Store,
    profile: &Profile,
    stress: Option<i32>,
    mood: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    if let Some(s) = stress {
        if !(1..=10).contains(&s) {
            bail!("stress level must be 1-10, got {s}");
        }
    }
    if stress.is_none() && mood.is_none() && notes.is_none() {
        bail!("nothing to record; pass --stress, --mood, or --notes");
    }

    let checkin = store.insert_checkin(Checkin {
        id: 0,
        user: profile.user.clone(),
        stress_level: stress,
        mood,
        notes,
        created_at_utc: Utc::now(),
    })?;

    println!("Recorded check-in #{}", checkin.id);
    Ok(())
}

fn insights(store: &mut dyn Store, profile: &Profile, days: i64) -> Result<()> {
    if days <= 0 {
        bail!("window must be positive, got {days}");
    }

    let out = store.checkin_insights(&profile.user, days, Utc::now())?;

    println!("# Check-in insights (last {days} days)\n");
    println!("Check-ins: {}", out.checkin_count);
    match out.avg_stress {
        Some(avg) => println!("Average stress: {avg:.1}"),
        None => println!("Average stress: (no stress levels recorded)"),
    }
    if let (Some(first), Some(last)) = (out.first_checkin, out.last_checkin) {
        println!("First: {}", first.format("%Y-%m-%d %H:%M UTC"));
        println!("Last:  {}", last.format("%Y-%m-%d %H:%M UTC"));
    }

    if !out.recent.is_empty() {
        println!("\n## Recent\n");
        for c in &out.recent {
            let stress = c
                .stress_level
                .map_or("-".to_string(), |s| s.to_string());
            let mood = c.mood.as_deref().unwrap_or("-");
            println!(
                "{}  stress={stress} mood={mood}",
                c.created_at_utc.format("%Y-%m-%d %H:%M")
            );
        }
    }

    Ok(())
}
