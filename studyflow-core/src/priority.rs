//! Deadline-driven priority scoring.

use chrono::{DateTime, Utc};

use crate::task::Task;

/// Score assigned when a task has no due date at all.
pub const NO_DEADLINE_SCORE: i32 = 5;

/// Map a deadline to a 1-10 urgency score from fixed thresholds on whole
/// calendar days until due (rounded up).
///
/// | days until due | score |
/// |---|---|
/// | no deadline | 5 |
/// | overdue     | 10 |
/// | 0-2         | 10 |
/// | 3-6         | 8 |
/// | 7-13        | 6 |
/// | 14-29       | 4 |
/// | 30+         | 2 |
///
/// Pure: every input maps to a defined score, including past deadlines.
pub fn score_deadline(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i32 {
    let Some(deadline) = deadline else {
        return NO_DEADLINE_SCORE;
    };

    let secs_left = (deadline - now).num_seconds();
    let days_until_due = (secs_left as f64 / 86_400.0).ceil() as i64;

    match days_until_due {
        d if d < 3 => 10, // overdue or due within two days
        d if d < 7 => 8,
        d if d < 14 => 6,
        d if d < 30 => 4,
        _ => 2,
    }
}

/// Priority the scheduler ranks by: the explicit value when set, otherwise
/// derived from the deadline.
pub fn effective_priority(task: &Task, now: DateTime<Utc>) -> i32 {
    task.priority
        .unwrap_or_else(|| score_deadline(task.deadline, now))
}
