//! Time blocks and the per-day schedule they make up.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Task,
    Break,
}

/// A contiguous scheduled interval, either task work or a break.
///
/// Times are naive local datetimes on the target date; interpreting them in a
/// concrete timezone is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,

    /// Set for task blocks only.
    pub task_id: Option<String>,
    pub title: String,
    pub priority: Option<i32>,
}

impl TimeBlock {
    pub fn for_task(
        task: &Task,
        priority: i32,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        Self {
            block_type: BlockType::Task,
            start_time,
            end_time,
            task_id: Some(task.id.clone()),
            title: task.title.clone(),
            priority: Some(priority),
        }
    }

    pub fn for_break(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            block_type: BlockType::Break,
            start_time,
            end_time,
            task_id: None,
            title: "Break".to_string(),
            priority: None,
        }
    }
}

/// The full ordered set of time blocks for one user on one calendar date.
/// Insertion order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub time_blocks: Vec<TimeBlock>,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.time_blocks.is_empty()
    }

    /// Ids of the tasks that made it onto the schedule. Callers wanting
    /// "N tasks did not fit" feedback diff this against their input set.
    pub fn task_ids(&self) -> Vec<&str> {
        self.time_blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Task)
            .filter_map(|b| b.task_id.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_block_json_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let task = Task::new("t1", "essay").with_priority(8);
        let block = TimeBlock::for_task(
            &task,
            8,
            date.and_hms_opt(8, 0, 0).unwrap(),
            date.and_hms_opt(9, 0, 0).unwrap(),
        );

        let json: serde_json::Value = serde_json::from_str(
            &serde_json::to_string(&block).unwrap(),
        )
        .unwrap();
        assert_eq!(json["type"], "task");
        assert_eq!(json["task_id"], "t1");
        assert_eq!(json["start_time"], "2024-01-01T08:00:00");
        assert_eq!(json["priority"], 8);

        let back: TimeBlock = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_task_ids_skips_breaks() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let task = Task::new("t1", "essay");
        let schedule = Schedule {
            time_blocks: vec![
                TimeBlock::for_task(
                    &task,
                    5,
                    date.and_hms_opt(8, 0, 0).unwrap(),
                    date.and_hms_opt(9, 0, 0).unwrap(),
                ),
                TimeBlock::for_break(
                    date.and_hms_opt(9, 0, 0).unwrap(),
                    date.and_hms_opt(9, 15, 0).unwrap(),
                ),
            ],
        };
        assert_eq!(schedule.task_ids(), vec!["t1"]);
    }
}
