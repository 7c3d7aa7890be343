//! Reminder projection for upcoming deadlines.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::priority::effective_priority;
use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderIntent {
    pub intent_id: String,
    pub task_id: String,
    pub title: String,
    pub body: String,
    pub send_at_utc: DateTime<Utc>,
    pub dedupe_key: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReminderPolicy {
    pub max_per_task: usize,
    pub high_lead_hours: i64,
    pub urgent_lead_minutes: i64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            max_per_task: 2,
            high_lead_hours: 2,
            urgent_lead_minutes: 15,
        }
    }
}

/// Deterministically project a task into reminder intents.
///
/// Completed tasks and tasks without a deadline project nothing. Lead times
/// follow the effective priority score: the hotter the task, the closer to
/// the deadline the nudges land.
pub fn project_task_reminders(
    task: &Task,
    now: DateTime<Utc>,
    policy: ReminderPolicy,
) -> Vec<ReminderIntent> {
    if task.status == TaskStatus::Completed {
        return vec![];
    }
    let Some(deadline) = task.deadline else {
        return vec![];
    };

    let score = effective_priority(task, now);

    let mut slots = Vec::new();
    if score >= 10 {
        slots.push(deadline - Duration::minutes(policy.urgent_lead_minutes));
        slots.push(deadline - Duration::hours(1));
    } else if score >= 8 {
        slots.push(deadline - Duration::hours(policy.high_lead_hours));
        slots.push(deadline - Duration::minutes(policy.urgent_lead_minutes));
    } else {
        slots.push(deadline - Duration::hours(24));
    }

    let title = format!("Reminder: {}", task.title);
    let body = format!("Task {} is due soon (priority {score}).", task.id);

    let mut out = Vec::new();
    for (i, send_at) in slots.into_iter().take(policy.max_per_task).enumerate() {
        if send_at <= now {
            continue;
        }
        // Unique per concrete send slot so repeated same-day projections
        // don't over-dedupe and drop legitimate sends.
        let dedupe_key = format!("{}:{}:{}", task.id, send_at.timestamp(), i);
        out.push(ReminderIntent {
            intent_id: format!("ri-{}-{}", task.id, i),
            task_id: task.id.clone(),
            title: title.clone(),
            body: body.clone(),
            send_at_utc: send_at,
            dedupe_key,
        });
    }

    out
}
