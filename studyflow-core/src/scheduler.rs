//! Greedy daily scheduler: highest priority first, fixed work/break cadence.
//!
//! The walk is a single linear pass. Tasks are stable-sorted by effective
//! priority (descending) and laid out from 08:00, each followed by a 15 minute
//! break, until a task would end at or past 22:00 - at which point the rest of
//! the queue is dropped for the day. Truncation is a documented policy, not an
//! error.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::priority::effective_priority;
use crate::schedule::{Schedule, TimeBlock};
use crate::task::Task;

/// First block starts at 08:00 local on the target date.
pub const DAY_START_HOUR: u32 = 8;

/// No task block may end at or past this hour.
pub const CUTOFF_HOUR: u32 = 22;

/// Fixed break appended after every task block.
pub const BREAK_MINUTES: i64 = 15;

/// Assumed duration for tasks without an estimate.
pub const DEFAULT_TASK_MINUTES: i32 = 60;

/// Scheduling preferences carried on the user record.
///
/// The walk does not consult these yet; the parameter exists so that
/// wake-time/energy preferences can be honored later without changing the
/// call sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub wake_hour: Option<u32>,
}

/// Lay the given tasks out into work/break blocks on `date`.
///
/// `now` feeds priority derivation for tasks without an explicit priority;
/// the walk itself is deterministic in its inputs. Callers are expected to
/// pass tasks already filtered to schedulable statuses, ordered
/// priority-desc/deadline-asc (ties keep that order under the stable sort).
pub fn generate_schedule(
    _profile: &UserProfile,
    tasks: &[Task],
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Schedule {
    let mut ranked: Vec<(i32, &Task)> = tasks
        .iter()
        .map(|t| (effective_priority(t, now), t))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let mut cursor = date
        .and_hms_opt(DAY_START_HOUR, 0, 0)
        .expect("start-of-day is a valid time");

    let mut time_blocks = Vec::new();

    for (priority, task) in ranked {
        let minutes = task.estimated_minutes.unwrap_or(DEFAULT_TASK_MINUTES);
        let end = cursor + Duration::minutes(i64::from(minutes));

        // A task that would run into the cutoff ends the day: no partial
        // block, and the remaining queue is dropped rather than deferred.
        if end.hour() >= CUTOFF_HOUR {
            break;
        }

        time_blocks.push(TimeBlock::for_task(task, priority, cursor, end));

        cursor = end + Duration::minutes(BREAK_MINUTES);
        time_blocks.push(TimeBlock::for_break(end, cursor));
    }

    Schedule { time_blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::BlockType;
    use chrono::TimeZone;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> chrono::NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_empty_input_empty_schedule() {
        let out = generate_schedule(&UserProfile::default(), &[], date(), now());
        assert!(out.is_empty());
    }

    #[test]
    fn test_end_to_end_layout() {
        let tasks = vec![
            Task::new("a", "A").with_estimate(480).with_priority(10),
            Task::new("b", "B").with_estimate(60).with_priority(5),
        ];
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), now());

        assert_eq!(out.time_blocks.len(), 4);

        let b = &out.time_blocks;
        assert_eq!(b[0].block_type, BlockType::Task);
        assert_eq!(b[0].task_id.as_deref(), Some("a"));
        assert_eq!((b[0].start_time, b[0].end_time), (hm(8, 0), hm(16, 0)));

        assert_eq!(b[1].block_type, BlockType::Break);
        assert_eq!((b[1].start_time, b[1].end_time), (hm(16, 0), hm(16, 15)));

        assert_eq!(b[2].task_id.as_deref(), Some("b"));
        assert_eq!((b[2].start_time, b[2].end_time), (hm(16, 15), hm(17, 15)));

        assert_eq!(b[3].block_type, BlockType::Break);
        assert_eq!((b[3].start_time, b[3].end_time), (hm(17, 15), hm(17, 30)));
    }

    #[test]
    fn test_blocks_tile_without_gaps() {
        let tasks: Vec<Task> = (0..5)
            .map(|i| Task::new(format!("t{i}"), "task").with_estimate(45))
            .collect();
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), now());

        for pair in out.time_blocks.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
    }

    #[test]
    fn test_task_blocks_end_before_cutoff() {
        let tasks: Vec<Task> = (0..20)
            .map(|i| Task::new(format!("t{i}"), "task").with_estimate(90))
            .collect();
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), now());

        assert!(!out.is_empty());
        for b in &out.time_blocks {
            if b.block_type == BlockType::Task {
                assert!(b.end_time.hour() < CUTOFF_HOUR);
            }
        }
    }

    #[test]
    fn test_oversized_task_dropped_entirely() {
        // 900 minutes from 08:00 would end at 23:00 -> nothing scheduled.
        let tasks = vec![Task::new("big", "thesis draft").with_estimate(900)];
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), now());
        assert!(out.is_empty());
    }

    #[test]
    fn test_cutoff_drops_rest_of_queue() {
        // First task fills the morning; second would cross 22:00; the third
        // would fit on its own but the walk has already stopped.
        let tasks = vec![
            Task::new("t1", "long").with_estimate(600).with_priority(10),
            Task::new("t2", "too late").with_estimate(300).with_priority(8),
            Task::new("t3", "short").with_estimate(30).with_priority(6),
        ];
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), now());
        assert_eq!(out.task_ids(), vec!["t1"]);
    }

    #[test]
    fn test_sorts_by_priority_descending() {
        let tasks = vec![
            Task::new("low", "low").with_priority(2).with_estimate(30),
            Task::new("high", "high").with_priority(9).with_estimate(30),
            Task::new("mid", "mid").with_priority(5).with_estimate(30),
        ];
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), now());
        assert_eq!(out.task_ids(), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_caller_order() {
        let tasks = vec![
            Task::new("first", "first").with_priority(5),
            Task::new("second", "second").with_priority(5),
            Task::new("third", "third").with_priority(5),
        ];
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), now());
        assert_eq!(out.task_ids(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_derives_priority_from_deadline_when_absent() {
        let n = now();
        let tasks = vec![
            Task::new("later", "later").with_deadline(n + Duration::days(20)),
            Task::new("soon", "soon").with_deadline(n + Duration::days(1)),
        ];
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), n);
        assert_eq!(out.task_ids(), vec!["soon", "later"]);

        let first = &out.time_blocks[0];
        assert_eq!(first.priority, Some(10));
    }

    #[test]
    fn test_every_task_block_followed_by_break() {
        let tasks = vec![
            Task::new("a", "a").with_estimate(30),
            Task::new("b", "b").with_estimate(30),
        ];
        let out = generate_schedule(&UserProfile::default(), &tasks, date(), now());

        let b = &out.time_blocks;
        assert_eq!(b.len(), 4);
        for i in (0..b.len()).step_by(2) {
            assert_eq!(b[i].block_type, BlockType::Task);
            assert_eq!(b[i + 1].block_type, BlockType::Break);
            assert_eq!(
                b[i + 1].end_time - b[i + 1].start_time,
                Duration::minutes(BREAK_MINUTES)
            );
        }
        // The trailing break after the last task is kept deliberately.
        assert_eq!(b.last().unwrap().block_type, BlockType::Break);
    }

    #[test]
    fn test_same_input_same_output() {
        let tasks = vec![
            Task::new("a", "a").with_priority(7).with_estimate(45),
            Task::new("b", "b").with_priority(7),
        ];
        let n = now();
        let once = generate_schedule(&UserProfile::default(), &tasks, date(), n);
        let twice = generate_schedule(&UserProfile::default(), &tasks, date(), n);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_profile_is_ignored() {
        let tasks = vec![Task::new("a", "a").with_priority(5)];
        let default = generate_schedule(&UserProfile::default(), &tasks, date(), now());
        let custom = generate_schedule(
            &UserProfile {
                name: Some("sam".into()),
                timezone: Some("America/Chicago".into()),
                wake_hour: Some(6),
            },
            &tasks,
            date(),
            now(),
        );
        assert_eq!(default, custom);
    }
}
