//! In-memory fallback store.
//!
//! Same semantics as the SQLite backend, nothing survives the process. Used
//! when config selects `backend = "memory"` and throughout the tests.

use std::collections::HashMap;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};

use studyflow_core::{Checkin, CheckinInsights, Schedule, Task};

use crate::{CheckinStore, ScheduleStore, StoredSchedule, TaskFilter, TaskStore, TaskUpdate};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: HashMap<String, Vec<Task>>,
    schedules: HashMap<(String, NaiveDate), StoredSchedule>,
    checkins: HashMap<String, Vec<Checkin>>,
    next_checkin_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    fn insert_task(&mut self, user: &str, task: Task) -> Result<()> {
        // ids are globally unique, mirroring the SQLite primary key
        if self.tasks.values().flatten().any(|t| t.id == task.id) {
            bail!("task id already exists: {}", task.id);
        }
        self.tasks.entry(user.to_string()).or_default().push(task);
        Ok(())
    }

    fn get_task(&self, user: &str, id: &str) -> Result<Option<Task>> {
        Ok(self
            .tasks
            .get(user)
            .and_then(|ts| ts.iter().find(|t| t.id == id))
            .cloned())
    }

    fn list_tasks(&self, user: &str, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut out: Vec<Task> = self
            .tasks
            .get(user)
            .map(|ts| {
                ts.iter()
                    .filter(|t| filter.status.is_none_or(|s| t.status == s))
                    .filter(|t| {
                        filter
                            .course_id
                            .as_deref()
                            .is_none_or(|c| t.course_id.as_deref() == Some(c))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // deadline asc (no-deadline first, as SQL NULLs sort), priority desc
        out.sort_by(|a, b| {
            a.deadline
                .cmp(&b.deadline)
                .then_with(|| b.priority.cmp(&a.priority))
        });
        Ok(out)
    }

    fn update_task(&mut self, user: &str, id: &str, update: &TaskUpdate) -> Result<Option<Task>> {
        let Some(tasks) = self.tasks.get_mut(user) else {
            return Ok(None);
        };
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        update.apply(task);
        Ok(Some(task.clone()))
    }

    fn delete_task(&mut self, user: &str, id: &str) -> Result<bool> {
        let Some(tasks) = self.tasks.get_mut(user) else {
            return Ok(false);
        };
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() != before)
    }

    fn schedulable_tasks(&self, user: &str, date: NaiveDate) -> Result<Vec<Task>> {
        let day_start = date.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();

        let mut out: Vec<Task> = self
            .tasks
            .get(user)
            .map(|ts| {
                ts.iter()
                    .filter(|t| t.status.is_schedulable())
                    .filter(|t| t.deadline.is_none_or(|d| d >= day_start))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // priority desc (unset last), deadline asc
        out.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.deadline.cmp(&b.deadline))
        });
        Ok(out)
    }
}

impl ScheduleStore for MemoryStore {
    fn upsert_schedule(&mut self, user: &str, date: NaiveDate, schedule: &Schedule) -> Result<()> {
        self.schedules.insert(
            (user.to_string(), date),
            StoredSchedule {
                user: user.to_string(),
                date,
                schedule: schedule.clone(),
                updated_at_utc: Utc::now(),
            },
        );
        Ok(())
    }

    fn get_schedule(&self, user: &str, date: NaiveDate) -> Result<Option<StoredSchedule>> {
        Ok(self.schedules.get(&(user.to_string(), date)).cloned())
    }
}

impl CheckinStore for MemoryStore {
    fn insert_checkin(&mut self, mut checkin: Checkin) -> Result<Checkin> {
        self.next_checkin_id += 1;
        checkin.id = self.next_checkin_id;
        self.checkins
            .entry(checkin.user.clone())
            .or_default()
            .push(checkin.clone());
        Ok(checkin)
    }

    fn checkin_insights(
        &self,
        user: &str,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<CheckinInsights> {
        let all = self.checkins.get(user).cloned().unwrap_or_default();
        Ok(CheckinInsights::compute(&all, window_days, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use studyflow_core::TaskStatus;

    #[test]
    fn test_task_crud_roundtrip() {
        let mut store = MemoryStore::new();
        store
            .insert_task("sam", Task::new("t1", "read chapter 4"))
            .unwrap();

        assert!(store.get_task("sam", "t1").unwrap().is_some());
        assert!(store.get_task("other", "t1").unwrap().is_none());

        let updated = store
            .update_task(
                "sam",
                "t1",
                &TaskUpdate {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);

        assert!(store.delete_task("sam", "t1").unwrap());
        assert!(!store.delete_task("sam", "t1").unwrap());
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut store = MemoryStore::new();
        store
            .insert_task("sam", Task::new("t1", "read chapter 4"))
            .unwrap();
        assert!(store.insert_task("sam", Task::new("t1", "again")).is_err());
        // the id column is the primary key, so another user can't reuse it
        assert!(store.insert_task("other", Task::new("t1", "theirs")).is_err());
    }

    #[test]
    fn test_schedulable_filters_status_and_deadline() {
        let now = Utc::now();
        let date = now.date_naive();
        let mut store = MemoryStore::new();

        store
            .insert_task("sam", Task::new("done", "done").with_status(TaskStatus::Completed))
            .unwrap();
        store
            .insert_task(
                "sam",
                Task::new("past", "past").with_deadline(now - Duration::days(2)),
            )
            .unwrap();
        store
            .insert_task(
                "sam",
                Task::new("due", "due")
                    .with_deadline(now + Duration::days(1))
                    .with_priority(8),
            )
            .unwrap();
        store
            .insert_task("sam", Task::new("open", "open").with_priority(3))
            .unwrap();

        let out = store.schedulable_tasks("sam", date).unwrap();
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["due", "open"]);
    }

    #[test]
    fn test_schedule_upsert_replaces_wholesale() {
        let mut store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let first = Schedule::default();
        store.upsert_schedule("sam", date, &first).unwrap();

        let mut second = Schedule::default();
        second.time_blocks.push(studyflow_core::TimeBlock::for_break(
            date.and_hms_opt(8, 0, 0).unwrap(),
            date.and_hms_opt(8, 15, 0).unwrap(),
        ));
        store.upsert_schedule("sam", date, &second).unwrap();

        let got = store.get_schedule("sam", date).unwrap().unwrap();
        assert_eq!(got.schedule, second);
    }

    #[test]
    fn test_checkin_ids_assigned_sequentially() {
        let mut store = MemoryStore::new();
        let now = Utc::now();
        let c = Checkin {
            id: 0,
            user: "sam".to_string(),
            stress_level: Some(4),
            mood: Some("ok".to_string()),
            notes: None,
            created_at_utc: now,
        };
        let first = store.insert_checkin(c.clone()).unwrap();
        let second = store.insert_checkin(c).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let insights = store.checkin_insights("sam", 30, now).unwrap();
        assert_eq!(insights.checkin_count, 2);
        assert_eq!(insights.avg_stress, Some(4.0));
    }
}
