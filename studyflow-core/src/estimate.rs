//! Coarse duration estimates by assignment kind and complexity.
//!
//! Used when a task is created without an explicit estimate but with a known
//! kind ("essay due friday"). Values are deliberately round: the scheduler
//! only needs a ballpark to lay out the day.

use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Essay,
    Homework,
    Project,
    Reading,
    Study,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for TaskKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "essay" => TaskKind::Essay,
            "homework" => TaskKind::Homework,
            "project" => TaskKind::Project,
            "reading" => TaskKind::Reading,
            "study" => TaskKind::Study,
            "other" | "default" => TaskKind::Other,
            other => bail!("unknown task kind: {other}"),
        })
    }
}

impl FromStr for Complexity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "low" => Complexity::Low,
            "medium" => Complexity::Medium,
            "high" => Complexity::High,
            other => bail!("unknown complexity: {other}"),
        })
    }
}

/// Estimated minutes for a task of the given kind and complexity.
pub fn estimate_minutes(kind: TaskKind, complexity: Complexity) -> i32 {
    use Complexity::*;

    let hours = match kind {
        TaskKind::Essay | TaskKind::Study => match complexity {
            Low => 2,
            Medium => 4,
            High => 8,
        },
        TaskKind::Project => match complexity {
            Low => 4,
            Medium => 8,
            High => 16,
        },
        TaskKind::Homework | TaskKind::Reading | TaskKind::Other => match complexity {
            Low => 1,
            Medium => 2,
            High => 4,
        },
    };

    hours * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimates_in_minutes() {
        assert_eq!(estimate_minutes(TaskKind::Essay, Complexity::Medium), 240);
        assert_eq!(estimate_minutes(TaskKind::Project, Complexity::High), 960);
        assert_eq!(estimate_minutes(TaskKind::Reading, Complexity::Low), 60);
        assert_eq!(estimate_minutes(TaskKind::Other, Complexity::Medium), 120);
    }

    #[test]
    fn test_parse_kind_and_complexity() {
        assert_eq!("Essay".parse::<TaskKind>().unwrap(), TaskKind::Essay);
        assert_eq!("default".parse::<TaskKind>().unwrap(), TaskKind::Other);
        assert!("exam".parse::<TaskKind>().is_err());

        assert_eq!("HIGH".parse::<Complexity>().unwrap(), Complexity::High);
        assert!("extreme".parse::<Complexity>().is_err());
    }
}
