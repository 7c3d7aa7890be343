//! SQLite-backed store (rusqlite, bundled).
//!
//! One file holds tasks, schedules, and check-ins. Schedules store their time
//! blocks as a JSON column since they are always replaced wholesale, never
//! patched. Schema is created on open; there is no migration history.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use studyflow_core::{Checkin, CheckinInsights, Schedule, Task, TaskStatus};
use studyflow_core::checkin::RECENT_CHECKIN_LIMIT;

use crate::{CheckinStore, ScheduleStore, StoredSchedule, TaskFilter, TaskStore, TaskUpdate};

const TASK_COLUMNS: &str =
    "id, title, description, course_id, status, priority, estimated_minutes, deadline, created_at";

fn format_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
    }
}

fn parse_status(s: &str) -> TaskStatus {
    match s {
        "in_progress" => TaskStatus::InProgress,
        "completed" => TaskStatus::Completed,
        _ => TaskStatus::Pending,
    }
}

fn format_utc(dt: DateTime<Utc>) -> String {
    // Fixed-width form so lexicographic comparison in SQL matches time order.
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC3339 column with fallback to now; rows only ever hold what
/// `format_utc` wrote.
fn parse_utc_fallback(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let status: String = row.get(4)?;
    let deadline: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        course_id: row.get(3)?,
        status: parse_status(&status),
        priority: row.get(5)?,
        estimated_minutes: row.get(6)?,
        deadline: deadline.as_deref().map(parse_utc_fallback),
        created_at_utc: parse_utc_fallback(&created_at),
    })
}

fn row_to_checkin(row: &Row) -> rusqlite::Result<Checkin> {
    let created_at: String = row.get(5)?;
    Ok(Checkin {
        id: row.get(0)?,
        user: row.get(1)?,
        stress_level: row.get(2)?,
        mood: row.get(3)?,
        notes: row.get(4)?,
        created_at_utc: parse_utc_fallback(&created_at),
    })
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("open database {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id                TEXT PRIMARY KEY,
                    user              TEXT NOT NULL,
                    title             TEXT NOT NULL,
                    description       TEXT,
                    course_id         TEXT,
                    status            TEXT NOT NULL,
                    priority          INTEGER,
                    estimated_minutes INTEGER,
                    deadline          TEXT,
                    created_at        TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_tasks_user_status ON tasks(user, status);

                CREATE TABLE IF NOT EXISTS schedules (
                    user        TEXT NOT NULL,
                    date        TEXT NOT NULL,
                    time_blocks TEXT NOT NULL,
                    updated_at  TEXT NOT NULL,
                    PRIMARY KEY (user, date)
                );

                CREATE TABLE IF NOT EXISTS checkins (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    user         TEXT NOT NULL,
                    stress_level INTEGER,
                    mood         TEXT,
                    notes        TEXT,
                    created_at   TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_checkins_user_created ON checkins(user, created_at);",
            )
            .context("create schema")?;
        Ok(())
    }
}

impl TaskStore for SqliteStore {
    fn insert_task(&mut self, user: &str, task: Task) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO tasks (id, user, title, description, course_id, status, priority,
                                    estimated_minutes, deadline, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    task.id,
                    user,
                    task.title,
                    task.description,
                    task.course_id,
                    format_status(task.status),
                    task.priority,
                    task.estimated_minutes,
                    task.deadline.map(format_utc),
                    format_utc(task.created_at_utc),
                ],
            )
            .with_context(|| format!("insert task {}", task.id))?;
        Ok(())
    }

    fn get_task(&self, user: &str, id: &str) -> Result<Option<Task>> {
        self.conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user = ?2"),
                params![id, user],
                row_to_task,
            )
            .optional()
            .with_context(|| format!("get task {id}"))
    }

    fn list_tasks(&self, user: &str, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user = ?1");
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user.to_string())];

        if let Some(status) = filter.status {
            args.push(Box::new(format_status(status).to_string()));
            sql.push_str(&format!(" AND status = ?{}", args.len()));
        }
        if let Some(course_id) = &filter.course_id {
            args.push(Box::new(course_id.clone()));
            sql.push_str(&format!(" AND course_id = ?{}", args.len()));
        }
        sql.push_str(" ORDER BY deadline ASC, priority DESC");

        let mut stmt = self.conn.prepare(&sql).context("prepare task list")?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())), row_to_task)
            .context("list tasks")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("read task row")?);
        }
        Ok(out)
    }

    fn update_task(&mut self, user: &str, id: &str, update: &TaskUpdate) -> Result<Option<Task>> {
        // Read-apply-write keeps the allow-list in one place (TaskUpdate::apply).
        let Some(mut task) = self.get_task(user, id)? else {
            return Ok(None);
        };
        update.apply(&mut task);

        self.conn
            .execute(
                "UPDATE tasks
                 SET title = ?1, description = ?2, course_id = ?3, status = ?4,
                     priority = ?5, estimated_minutes = ?6, deadline = ?7
                 WHERE id = ?8 AND user = ?9",
                params![
                    task.title,
                    task.description,
                    task.course_id,
                    format_status(task.status),
                    task.priority,
                    task.estimated_minutes,
                    task.deadline.map(format_utc),
                    id,
                    user,
                ],
            )
            .with_context(|| format!("update task {id}"))?;
        Ok(Some(task))
    }

    fn delete_task(&mut self, user: &str, id: &str) -> Result<bool> {
        let n = self
            .conn
            .execute(
                "DELETE FROM tasks WHERE id = ?1 AND user = ?2",
                params![id, user],
            )
            .with_context(|| format!("delete task {id}"))?;
        Ok(n > 0)
    }

    fn schedulable_tasks(&self, user: &str, date: NaiveDate) -> Result<Vec<Task>> {
        let day_start = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
            .and_utc();

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE user = ?1
                   AND status IN ('pending', 'in_progress')
                   AND (deadline IS NULL OR deadline >= ?2)
                 ORDER BY priority DESC, deadline ASC"
            ))
            .context("prepare schedulable query")?;

        let rows = stmt
            .query_map(params![user, format_utc(day_start)], row_to_task)
            .context("query schedulable tasks")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("read task row")?);
        }
        Ok(out)
    }
}

impl ScheduleStore for SqliteStore {
    fn upsert_schedule(&mut self, user: &str, date: NaiveDate, schedule: &Schedule) -> Result<()> {
        let blocks = serde_json::to_string(&schedule.time_blocks).context("encode time blocks")?;
        self.conn
            .execute(
                "INSERT INTO schedules (user, date, time_blocks, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user, date)
                 DO UPDATE SET time_blocks = excluded.time_blocks,
                               updated_at = excluded.updated_at",
                params![user, date.to_string(), blocks, format_utc(Utc::now())],
            )
            .with_context(|| format!("upsert schedule {user}/{date}"))?;
        Ok(())
    }

    fn get_schedule(&self, user: &str, date: NaiveDate) -> Result<Option<StoredSchedule>> {
        let row = self
            .conn
            .query_row(
                "SELECT time_blocks, updated_at FROM schedules WHERE user = ?1 AND date = ?2",
                params![user, date.to_string()],
                |row| {
                    let blocks: String = row.get(0)?;
                    let updated_at: String = row.get(1)?;
                    Ok((blocks, updated_at))
                },
            )
            .optional()
            .with_context(|| format!("get schedule {user}/{date}"))?;

        let Some((blocks, updated_at)) = row else {
            return Ok(None);
        };

        Ok(Some(StoredSchedule {
            user: user.to_string(),
            date,
            schedule: Schedule {
                time_blocks: serde_json::from_str(&blocks).context("decode time blocks")?,
            },
            updated_at_utc: parse_utc_fallback(&updated_at),
        }))
    }
}

impl CheckinStore for SqliteStore {
    fn insert_checkin(&mut self, mut checkin: Checkin) -> Result<Checkin> {
        self.conn
            .execute(
                "INSERT INTO checkins (user, stress_level, mood, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    checkin.user,
                    checkin.stress_level,
                    checkin.mood,
                    checkin.notes,
                    format_utc(checkin.created_at_utc),
                ],
            )
            .context("insert checkin")?;
        checkin.id = self.conn.last_insert_rowid();
        Ok(checkin)
    }

    fn checkin_insights(
        &self,
        user: &str,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Result<CheckinInsights> {
        let since = now - chrono::Duration::days(window_days);

        let (avg_stress, checkin_count, first, last) = self
            .conn
            .query_row(
                "SELECT AVG(stress_level), COUNT(*), MIN(created_at), MAX(created_at)
                 FROM checkins
                 WHERE user = ?1 AND created_at >= ?2",
                params![user, format_utc(since)],
                |row| {
                    let avg: Option<f64> = row.get(0)?;
                    let count: i64 = row.get(1)?;
                    let first: Option<String> = row.get(2)?;
                    let last: Option<String> = row.get(3)?;
                    Ok((avg, count, first, last))
                },
            )
            .context("aggregate checkins")?;

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user, stress_level, mood, notes, created_at
                 FROM checkins
                 WHERE user = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2",
            )
            .context("prepare recent checkins")?;
        let rows = stmt
            .query_map(params![user, RECENT_CHECKIN_LIMIT as i64], row_to_checkin)
            .context("query recent checkins")?;

        let mut recent = Vec::new();
        for row in rows {
            recent.push(row.context("read checkin row")?);
        }

        Ok(CheckinInsights {
            avg_stress,
            checkin_count: checkin_count as usize,
            first_checkin: first.as_deref().map(parse_utc_fallback),
            last_checkin: last.as_deref().map(parse_utc_fallback),
            recent,
        })
    }
}
