use anyhow::{Result, bail};
use chrono::Utc;
use clap::Subcommand;
use uuid::Uuid;

use studyflow_core::{
    Complexity, Task, TaskKind, TaskStatus, estimate_minutes, parse_local_deadline_to_utc,
    score_deadline,
};
use studyflow_store::{Store, TaskFilter, TaskUpdate};

use crate::state::Profile;

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Create a task
    Add {
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Course the task belongs to
        #[arg(long)]
        course: Option<String>,

        /// Local deadline, "YYYY-MM-DD HH:MM" in your profile timezone
        #[arg(long)]
        deadline: Option<String>,

        /// Explicit 1-10 urgency; derived from the deadline when omitted
        #[arg(long)]
        priority: Option<i32>,

        /// Estimated minutes
        #[arg(long)]
        estimate: Option<i32>,

        /// Assignment kind (essay/homework/project/reading/study/other),
        /// used to estimate a duration when --estimate is omitted
        #[arg(long)]
        kind: Option<TaskKind>,

        /// low/medium/high (default medium), modifies --kind's estimate
        #[arg(long)]
        complexity: Option<Complexity>,
    },

    /// List tasks
    List {
        /// pending/in_progress/completed
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        course: Option<String>,
    },

    /// Show one task
    Show { id: String },

    /// Update allow-listed fields of a task
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        course: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        priority: Option<i32>,

        #[arg(long)]
        estimate: Option<i32>,

        #[arg(long)]
        deadline: Option<String>,

        #[arg(long, default_value_t = false)]
        clear_deadline: bool,

        #[arg(long, default_value_t = false)]
        clear_priority: bool,
    },

    /// Mark a task completed
    Done { id: String },

    /// Delete a task
    Rm { id: String },
}

pub fn run(cmd: TaskCommand, store: &mut dyn Store, profile: &Profile) -> Result<()> {
    match cmd {
        TaskCommand::Add {
            title,
            description,
            course,
            deadline,
            priority,
            estimate,
            kind,
            complexity,
        } => add(
            store,
            profile,
            title,
            description,
            course,
            deadline,
            priority,
            estimate,
            kind,
            complexity,
        ),
        TaskCommand::List { status, course } => list(store, profile, status, course),
        TaskCommand::Show { id } => show(store, profile, &id),
        TaskCommand::Update {
            id,
            title,
            description,
            course,
            status,
            priority,
            estimate,
            deadline,
            clear_deadline,
            clear_priority,
        } => {
            let update = build_update(
                profile,
                title,
                description,
                course,
                status,
                priority,
                estimate,
                deadline,
                clear_deadline,
                clear_priority,
            )?;
            apply_update(store, profile, &id, &update)
        }
        TaskCommand::Done { id } => {
            let update = TaskUpdate {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            };
            apply_update(store, profile, &id, &update)
        }
        TaskCommand::Rm { id } => {
            if !store.delete_task(&profile.user, &id)? {
                bail!("task not found: {id}");
            }
            println!("Deleted {id}");
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn add(
    store: &mut dyn Store,
    profile: &Profile,
    title: String,
    description: Option<String>,
    course: Option<String>,
    deadline: Option<String>,
    priority: Option<i32>,
    estimate: Option<i32>,
    kind: Option<TaskKind>,
    complexity: Option<Complexity>,
) -> Result<()> {
    if let Some(p) = priority {
        validate_priority(p)?;
    }
    if let Some(m) = estimate {
        validate_estimate(m)?;
    }

    let deadline = deadline
        .map(|d| parse_local_deadline_to_utc(&d, &profile.timezone))
        .transpose()?;

    let now = Utc::now();
    // Materialize a priority at intake (explicit, or derived from the
    // deadline) so list/schedule queries can order on the column.
    let priority = priority.unwrap_or_else(|| score_deadline(deadline, now));

    let estimate = estimate
        .or_else(|| kind.map(|k| estimate_minutes(k, complexity.unwrap_or_default())));

    let mut task = Task::new(Uuid::new_v4().to_string(), title).with_priority(priority);
    task.description = description;
    task.course_id = course;
    task.deadline = deadline;
    task.estimated_minutes = estimate;

    let id = task.id.clone();
    store.insert_task(&profile.user, task)?;
    println!("Added {id} (priority {priority})");
    Ok(())
}

fn list(
    store: &mut dyn Store,
    profile: &Profile,
    status: Option<String>,
    course: Option<String>,
) -> Result<()> {
    let filter = TaskFilter {
        status: status.as_deref().map(parse_status).transpose()?,
        course_id: course,
    };

    let tasks = store.list_tasks(&profile.user, &filter)?;
    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    for t in &tasks {
        println!("{}", format_task_line(t));
    }
    Ok(())
}

fn show(store: &mut dyn Store, profile: &Profile, id: &str) -> Result<()> {
    let Some(task) = store.get_task(&profile.user, id)? else {
        bail!("task not found: {id}");
    };
    println!("{}", serde_json::to_string_pretty(&task)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_update(
    profile: &Profile,
    title: Option<String>,
    description: Option<String>,
    course: Option<String>,
    status: Option<String>,
    priority: Option<i32>,
    estimate: Option<i32>,
    deadline: Option<String>,
    clear_deadline: bool,
    clear_priority: bool,
) -> Result<TaskUpdate> {
    if let Some(p) = priority {
        validate_priority(p)?;
    }
    if let Some(m) = estimate {
        validate_estimate(m)?;
    }

    let deadline = if clear_deadline {
        Some(None)
    } else {
        deadline
            .map(|d| parse_local_deadline_to_utc(&d, &profile.timezone))
            .transpose()?
            .map(Some)
    };

    let priority = if clear_priority {
        Some(None)
    } else {
        priority.map(Some)
    };

    let update = TaskUpdate {
        title,
        description: description.map(Some),
        course_id: course.map(Some),
        status: status.as_deref().map(parse_status).transpose()?,
        priority,
        estimated_minutes: estimate.map(Some),
        deadline,
    };

    if update.is_empty() {
        bail!("no fields to update");
    }
    Ok(update)
}

fn apply_update(
    store: &mut dyn Store,
    profile: &Profile,
    id: &str,
    update: &TaskUpdate,
) -> Result<()> {
    let Some(task) = store.update_task(&profile.user, id, update)? else {
        bail!("task not found: {id}");
    };
    println!("{}", format_task_line(&task));
    Ok(())
}

fn validate_priority(p: i32) -> Result<()> {
    if !(1..=10).contains(&p) {
        bail!("priority must be 1-10, got {p}");
    }
    Ok(())
}

// The scheduler walks forward from each block's start; a non-positive
// duration would produce a block that ends before it begins.
fn validate_estimate(minutes: i32) -> Result<()> {
    if minutes < 1 {
        bail!("estimate must be at least 1 minute, got {minutes}");
    }
    Ok(())
}

pub fn parse_status(s: &str) -> Result<TaskStatus> {
    Ok(match s {
        "pending" => TaskStatus::Pending,
        "in_progress" => TaskStatus::InProgress,
        "completed" => TaskStatus::Completed,
        other => bail!("unknown status: {other} (expected pending/in_progress/completed)"),
    })
}

fn format_task_line(t: &Task) -> String {
    let status = match t.status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
    };
    let deadline = t
        .deadline
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "no deadline".to_string());
    let estimate = t
        .estimated_minutes
        .map(|m| format!("{m} min"))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "[{status}] {} | prio {} | {deadline} | {estimate} | {}",
        t.id,
        t.priority.map_or("-".to_string(), |p| p.to_string()),
        t.title
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyflow_store::{MemoryStore, TaskStore};

    #[test]
    fn test_add_rejects_non_positive_estimate() {
        let mut store = MemoryStore::new();
        let profile = Profile::default();

        for bad in [0, -120] {
            let err = add(
                &mut store,
                &profile,
                "essay".to_string(),
                None,
                None,
                None,
                None,
                Some(bad),
                None,
                None,
            )
            .unwrap_err();
            assert!(err.to_string().contains("estimate"), "{err}");
        }

        // nothing was persisted
        let tasks = store.list_tasks(&profile.user, &TaskFilter::default()).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_update_rejects_non_positive_estimate() {
        let profile = Profile::default();
        let err = build_update(
            &profile,
            None,
            None,
            None,
            None,
            None,
            Some(0),
            None,
            false,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("estimate"), "{err}");

        let update = build_update(
            &profile,
            None,
            None,
            None,
            None,
            None,
            Some(90),
            None,
            false,
            false,
        )
        .unwrap();
        assert_eq!(update.estimated_minutes, Some(Some(90)));
    }
}
