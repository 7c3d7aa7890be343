use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use studyflow_store::{MemoryStore, SqliteStore, Store};

use crate::state::ensure_studyflow_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// "sqlite" (durable) or "memory" (fallback; nothing survives the process).
    pub backend: String,
    /// Database path for the sqlite backend. Relative paths resolve under
    /// ~/.studyflow/.
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreSection {
                backend: "sqlite".to_string(),
                path: "studyflow.db".to_string(),
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_studyflow_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

/// Open the backend named in config.
pub fn open_store(cfg: &Config) -> Result<Box<dyn Store>> {
    match cfg.store.backend.as_str() {
        "sqlite" => {
            let mut path = PathBuf::from(&cfg.store.path);
            if path.is_relative() {
                path = ensure_studyflow_home()?.join(path);
            }
            Ok(Box::new(SqliteStore::open(&path)?))
        }
        "memory" => {
            eprintln!("warning: memory backend selected; nothing persists across runs");
            Ok(Box::new(MemoryStore::new()))
        }
        other => bail!("unknown store backend: {other} (expected sqlite or memory)"),
    }
}
