//! studyflow-core: Core types and scheduling logic for the Studyflow planner

pub mod checkin;
pub mod estimate;
pub mod priority;
pub mod reminders;
pub mod schedule;
pub mod scheduler;
pub mod task;
pub mod time;

pub use checkin::{Checkin, CheckinInsights};
pub use estimate::{Complexity, TaskKind, estimate_minutes};
pub use priority::{NO_DEADLINE_SCORE, effective_priority, score_deadline};
pub use reminders::{ReminderIntent, ReminderPolicy, project_task_reminders};
pub use schedule::{BlockType, Schedule, TimeBlock};
pub use scheduler::{
    BREAK_MINUTES, CUTOFF_HOUR, DAY_START_HOUR, DEFAULT_TASK_MINUTES, UserProfile,
    generate_schedule,
};
pub use task::{Task, TaskStatus};
pub use time::{parse_local_deadline_to_utc, today_in_tz};
