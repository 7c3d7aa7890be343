use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub fn studyflow_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("STUDYFLOW_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".studyflow"))
}

pub fn ensure_studyflow_home() -> Result<PathBuf> {
    let dir = studyflow_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub created_at_utc: Option<String>,
    /// Store key for this machine's tasks/schedules/check-ins.
    #[serde(default = "default_user")]
    pub user: String,
    pub name: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            created_at_utc: None,
            user: default_user(),
            name: None,
            timezone: default_timezone(),
        }
    }
}

fn default_user() -> String {
    "default".to_string()
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_studyflow_home()?.join("profile.json"))
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    let p = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_profile() -> Result<Profile> {
    let p = profile_path()?;
    if !p.exists() {
        return Ok(Profile::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}
