//! Task model for the Studyflow scheduling engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Only pending/in-progress tasks are eligible for scheduling.
    /// Filtering on this is the store query's job, not the scheduler's.
    pub fn is_schedulable(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

/// Core task type.
///
/// Note: we keep this small + serializable. Storage lives in studyflow-store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,

    /// Course the task belongs to, when it came from one.
    pub course_id: Option<String>,

    pub status: TaskStatus,

    /// Explicit 1-10 urgency. Derived from the deadline when absent.
    pub priority: Option<i32>,

    /// Minutes. The scheduler assumes 60 when absent.
    pub estimated_minutes: Option<i32>,

    /// Optional hard deadline (UTC). Absence means "no due date".
    pub deadline: Option<DateTime<Utc>>,

    pub created_at_utc: DateTime<Utc>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            course_id: None,
            status: TaskStatus::Pending,
            priority: None,
            estimated_minutes: None,
            deadline: None,
            created_at_utc: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_estimate(mut self, minutes: i32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
