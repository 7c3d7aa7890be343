use anyhow::Result;
use std::io::{self, Write};

use crate::config;
use crate::state::{Profile, profile_path, write_profile};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn run_setup() -> Result<()> {
    println!("Studyflow setup\n");

    let name = prompt("Your name (optional)")?;
    let user = prompt("User handle (blank for 'default')")?;
    let timezone = prompt("IANA timezone (blank for America/Chicago)")?;

    let mut profile = Profile {
        created_at_utc: Some(chrono::Utc::now().to_rfc3339()),
        ..Profile::default()
    };
    if !name.is_empty() {
        profile.name = Some(name);
    }
    if !user.is_empty() {
        profile.user = user;
    }
    if !timezone.is_empty() {
        // Validate before persisting; a bad tz would poison every deadline parse.
        studyflow_core::today_in_tz(&timezone)?;
        profile.timezone = timezone;
    }

    write_profile(&profile)?;
    config::init_config()?;

    println!("\nWrote:");
    println!("- {}", profile_path()?.display());
    println!("- {}", config::config_path()?.display());

    println!("\nNext steps:");
    println!("- studyflow task add \"essay draft\" --deadline \"2026-09-01 23:59\" --kind essay");
    println!("- studyflow schedule generate");
    println!("- studyflow checkin add --stress 4 --mood ok");

    Ok(())
}
