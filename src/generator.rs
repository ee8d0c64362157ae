//! Checklist generation and task status mutation.
//!
//! Every function here is pure: wall-clock time enters only through the `_at`
//! variants' `now`/`today` arguments, and the convenience wrappers simply pass
//! `Utc::now()`. Mutations clone the input checklist and return the new value.
//!
//! Calendar decisions (phase status, deadlines, relative dates) use the local
//! date of the instant involved, see [`local_date`].

use std::collections::HashSet;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use tracing::debug;

use crate::error::{ChecklistError, Result};
use crate::fields::*;
use crate::task::*;
use crate::template::{base_hours, level_multiplier, template_for};

/// Generate a checklist anchored at the current time.
pub fn generate_checklist(config: &ReleaseConfiguration) -> Result<Checklist> {
    generate_checklist_at(config, Utc::now())
}

/// Generate a checklist for `config`, using `now` as the creation time and its
/// local date as the reference for initial phase status.
///
/// Template tasks whose category is excluded are dropped; custom tasks are
/// appended to the phase they name. A custom task naming a phase the template
/// does not define rejects the whole call, as does a release date too close to
/// the end of the calendar to fit the timeline.
pub fn generate_checklist_at(config: &ReleaseConfiguration, now: DateTime<Utc>) -> Result<Checklist> {
    let template = template_for(config.release_type);

    if let Some(stray) = config
        .custom_tasks
        .iter()
        .find(|c| !template.phases.iter().any(|p| p.name == c.phase))
    {
        return Err(ChecklistError::UnknownPhase(stray.phase.clone()));
    }

    let today = local_date(now);
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut phases = Vec::with_capacity(template.phases.len());

    for phase_tmpl in template.phases {
        let start_date = config
            .release_date
            .map(|d| calculate_due_date(d, phase_tmpl.start_week))
            .transpose()?;
        let end_date = config
            .release_date
            .map(|d| calculate_due_date(d, phase_tmpl.end_week))
            .transpose()?;

        let mut tasks: Vec<Task> = phase_tmpl
            .tasks
            .iter()
            .filter(|t| !config.exclude_categories.iter().any(|c| c == t.category))
            .map(|t| Task {
                id: t.id.to_string(),
                task: t.task.to_string(),
                priority: t.priority,
                category: t.category.to_string(),
                completed: false,
                completed_at: None,
                due_date: start_date,
                notes: None,
                estimated_hours: estimated_hours(t.id, &config.artist_level),
            })
            .collect();

        for custom in config.custom_tasks.iter().filter(|c| c.phase == phase_tmpl.name) {
            let id = format!("custom_{}", custom.id);
            tasks.push(Task {
                estimated_hours: estimated_hours(&id, &config.artist_level),
                id,
                task: custom.task.clone(),
                priority: custom.priority,
                category: custom.category.clone().unwrap_or_else(|| "custom".to_string()),
                completed: false,
                completed_at: None,
                due_date: start_date,
                notes: None,
            });
        }

        for task in &tasks {
            if !seen_ids.insert(task.id.clone()) {
                return Err(ChecklistError::DuplicateTaskId(task.id.clone()));
            }
        }

        let mut phase = Phase {
            id: phase_slug(phase_tmpl.name),
            name: phase_tmpl.name.to_string(),
            start_week: phase_tmpl.start_week,
            end_week: phase_tmpl.end_week,
            start_date,
            end_date,
            status: PhaseStatus::Upcoming,
            tasks,
        };
        phase.status = phase_status(&phase, today);
        phases.push(phase);
    }

    let mut checklist = Checklist {
        release_type: template.name.to_string(),
        kind: config.release_type,
        timeline_weeks: template.timeline_weeks,
        release_date: config.release_date,
        artist_level: config.artist_level.clone(),
        created_at: now,
        last_updated: None,
        phases,
        total_tasks: 0,
        completed_tasks: 0,
    };
    checklist.recount();

    debug!(
        release_type = %config.release_type,
        total_tasks = checklist.total_tasks,
        excluded = config.exclude_categories.len(),
        custom = config.custom_tasks.len(),
        "generated checklist"
    );

    Ok(checklist)
}

/// Shift `anchor` by `week_offset` weeks of calendar days (negative is earlier).
///
/// Fails with `InvalidDate` when the result falls outside the representable
/// calendar.
pub fn calculate_due_date(anchor: NaiveDate, week_offset: i64) -> Result<NaiveDate> {
    week_offset
        .checked_mul(7)
        .and_then(Duration::try_days)
        .and_then(|offset| anchor.checked_add_signed(offset))
        .ok_or_else(|| ChecklistError::InvalidDate(anchor.to_string()))
}

/// The calendar date of `now` in the local time zone.
pub fn local_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

/// Today's local date.
pub fn local_today() -> NaiveDate {
    local_date(Utc::now())
}

/// Set one task's completion state (and notes, when given) at the current time.
pub fn update_task_status(
    checklist: &Checklist,
    task_id: &str,
    completed: bool,
    notes: Option<&str>,
) -> Result<Checklist> {
    update_task_status_at(checklist, task_id, completed, notes, Utc::now())
}

/// Return a copy of `checklist` with task `task_id` marked `completed`.
///
/// Counters and phase statuses are recomputed and `last_updated` is set to
/// `now`. Blank notes leave existing notes in place. An unknown id yields
/// `TaskNotFound` and the input is left as it was.
pub fn update_task_status_at(
    checklist: &Checklist,
    task_id: &str,
    completed: bool,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Checklist> {
    if checklist.find_task(task_id).is_none() {
        return Err(ChecklistError::TaskNotFound(task_id.to_string()));
    }

    let today = local_date(now);
    let mut updated = checklist.clone();

    for phase in updated.phases.iter_mut() {
        if let Some(task) = phase.tasks.iter_mut().find(|t| t.id == task_id) {
            task.completed_at = match (completed, task.completed) {
                (true, true) => task.completed_at,
                (true, false) => Some(now),
                (false, _) => None,
            };
            task.completed = completed;
            if let Some(n) = notes.map(str::trim).filter(|n| !n.is_empty()) {
                task.notes = Some(n.to_string());
            }
        }
        phase.status = phase_status(phase, today);
    }

    updated.recount();
    updated.last_updated = Some(now);

    debug!(
        task_id,
        completed,
        completed_tasks = updated.completed_tasks,
        total_tasks = updated.total_tasks,
        "updated task status"
    );

    Ok(updated)
}

/// Derive a phase's status from its tasks and start date.
///
/// A phase with tasks that are all done is completed; one with any progress,
/// or whose start date has been reached, is active; anything else is upcoming.
pub fn phase_status(phase: &Phase, today: NaiveDate) -> PhaseStatus {
    let total = phase.task_count();
    let done = phase.completed_count();
    if total > 0 && done == total {
        PhaseStatus::Completed
    } else if done > 0 || phase.start_date.is_some_and(|d| d <= today) {
        PhaseStatus::Active
    } else {
        PhaseStatus::Upcoming
    }
}

/// One milestone per phase, dated at the phase's end.
pub fn milestones(checklist: &Checklist) -> Vec<Milestone> {
    checklist
        .phases
        .iter()
        .map(|phase| Milestone {
            id: phase.id.clone(),
            name: phase.name.clone(),
            date: phase.end_date,
            completed: phase.status == PhaseStatus::Completed,
            task_count: phase.task_count(),
            completed_task_count: phase.completed_count(),
            description: format!("Complete {} phase tasks", phase.name),
        })
        .collect()
}

/// Estimated effort for a task, scaled by the artist's experience level.
pub fn estimated_hours(task_id: &str, artist_level: &str) -> u32 {
    (base_hours(task_id) as f64 * level_multiplier(artist_level)).ceil() as u32
}

/// Lowercase, underscore-separated identifier for a phase name.
pub fn phase_slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Parse a release date.
///
/// Supports:
/// - "YYYY-MM-DD"
/// - RFC 3339 timestamps (the date part is kept)
/// - "today", "tomorrow"
/// - "in 3d", "in 6w", "in 2m" (30-day months)
pub fn parse_release_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = input.trim().to_lowercase();
    let invalid = || ChecklistError::InvalidDate(input.to_string());

    match s.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return today.succ_opt().ok_or_else(invalid),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        let (amount, days_per_unit) = if let Some(n) = rest.strip_suffix('d') {
            (n, 1)
        } else if let Some(n) = rest.strip_suffix('w') {
            (n, 7)
        } else if let Some(n) = rest.strip_suffix('m') {
            (n, 30)
        } else {
            return Err(invalid());
        };
        let amount: i64 = amount.trim().parse().map_err(|_| invalid())?;
        return amount
            .checked_mul(days_per_unit)
            .and_then(Duration::try_days)
            .and_then(|offset| today.checked_add_signed(offset))
            .ok_or_else(invalid);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.date_naive())
        .map_err(|_| invalid())
}
