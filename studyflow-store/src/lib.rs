//! studyflow-store: repositories for tasks, schedules, and check-ins.
//!
//! The original service kept module-level mutable arrays as an in-memory
//! fallback next to its SQL pool. Here both backends live behind one explicit
//! trait surface: `SqliteStore` for durable storage, `MemoryStore` as the
//! fallback and for tests.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use studyflow_core::{Checkin, CheckinInsights, Schedule, Task, TaskStatus};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Typed, allow-listed task update.
///
/// Only the fields named here can ever reach a persistence write; arbitrary
/// client-supplied keys have nowhere to go. Outer `None` leaves a field
/// untouched; `Some(None)` on the nested options clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub course_id: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Option<i32>>,
    pub estimated_minutes: Option<Option<i32>>,
    pub deadline: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to a task in place. Shared by the memory store; the SQLite store
    /// reads, applies, and writes the whole row back.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(course_id) = &self.course_id {
            task.course_id = course_id.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(estimated_minutes) = self.estimated_minutes {
            task.estimated_minutes = estimated_minutes;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
    }
}

/// Filters for task listing.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub course_id: Option<String>,
}

/// A persisted schedule row: one per `(user, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSchedule {
    pub user: String,
    pub date: NaiveDate,
    pub schedule: Schedule,
    pub updated_at_utc: DateTime<Utc>,
}

pub trait TaskStore {
    fn insert_task(&mut self, user: &str, task: Task) -> Result<()>;

    fn get_task(&self, user: &str, id: &str) -> Result<Option<Task>>;

    /// Tasks for `user`, deadline-asc then priority-desc.
    fn list_tasks(&self, user: &str, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Returns the updated task, or `None` when the id doesn't belong to the
    /// user.
    fn update_task(&mut self, user: &str, id: &str, update: &TaskUpdate) -> Result<Option<Task>>;

    /// Returns whether a row was deleted.
    fn delete_task(&mut self, user: &str, id: &str) -> Result<bool>;

    /// Pending/in-progress tasks whose deadline is absent or on/after `date`,
    /// priority-desc then deadline-asc. This is the scheduler's input query.
    fn schedulable_tasks(&self, user: &str, date: NaiveDate) -> Result<Vec<Task>>;
}

pub trait ScheduleStore {
    /// Insert or wholesale-replace the schedule for `(user, date)`.
    ///
    /// Concurrent upserts on the same key are last-write-wins; there is no
    /// merge.
    fn upsert_schedule(&mut self, user: &str, date: NaiveDate, schedule: &Schedule) -> Result<()>;

    fn get_schedule(&self, user: &str, date: NaiveDate) -> Result<Option<StoredSchedule>>;
}

pub trait CheckinStore {
    /// Persist a check-in and return it with its assigned id.
    fn insert_checkin(&mut self, checkin: Checkin) -> Result<Checkin>;

    /// Aggregates over the trailing `window_days`, plus the most recent
    /// check-ins overall.
    fn checkin_insights(
        &self,
        user: &str,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<CheckinInsights>;
}

/// Everything the CLI needs from one backend.
pub trait Store: TaskStore + ScheduleStore + CheckinStore {}

impl<T: TaskStore + ScheduleStore + CheckinStore> Store for T {}
