//! Completion statistics and deadline tracking for a checklist.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::fields::*;
use crate::generator::local_today;
use crate::task::{percent, Checklist, Phase};

/// How far ahead `upcoming_deadlines` looks.
pub const DEADLINE_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub overall: OverallStats,
    pub by_phase: Vec<PhaseStats>,
    pub by_category: BTreeMap<String, CategoryStats>,
    pub by_priority: PriorityStats,
    pub upcoming_deadlines: Vec<Deadline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub progress: u32,
    /// Sum of estimated hours over incomplete tasks.
    pub estimated_hours_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub name: String,
    pub task_count: usize,
    pub completed_count: usize,
    pub progress: u32,
    /// Days until the phase end date; negative once it has passed.
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityStats {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub kind: DeadlineKind,
    pub name: String,
    pub date: NaiveDate,
    pub days_remaining: i64,
    pub priority: Priority,
    pub category: Option<String>,
}

/// Analytics relative to today's local date.
pub fn generate_analytics(checklist: &Checklist) -> Analytics {
    generate_analytics_at(checklist, local_today())
}

/// Aggregate completion statistics for `checklist` as seen on `today`.
pub fn generate_analytics_at(checklist: &Checklist, today: NaiveDate) -> Analytics {
    let mut by_category: BTreeMap<String, CategoryStats> = BTreeMap::new();
    let mut by_priority = PriorityStats::default();
    let mut hours_remaining = 0;

    for task in checklist.tasks() {
        let entry = by_category.entry(task.category.clone()).or_default();
        entry.total += 1;
        if task.completed {
            entry.completed += 1;
        } else {
            hours_remaining += task.estimated_hours;
        }

        match task.priority {
            Priority::High => by_priority.high += 1,
            Priority::Medium => by_priority.medium += 1,
            Priority::Low => by_priority.low += 1,
        }
    }

    let by_phase = checklist
        .phases
        .iter()
        .map(|phase| PhaseStats {
            name: phase.name.clone(),
            task_count: phase.task_count(),
            completed_count: phase.completed_count(),
            progress: phase.progress(),
            days_remaining: phase.end_date.map(|d| (d - today).num_days()),
        })
        .collect();

    Analytics {
        overall: OverallStats {
            total_tasks: checklist.total_tasks,
            completed_tasks: checklist.completed_tasks,
            progress: percent(checklist.completed_tasks, checklist.total_tasks),
            estimated_hours_remaining: hours_remaining,
        },
        by_phase,
        by_category,
        by_priority,
        upcoming_deadlines: upcoming_deadlines(&checklist.phases, today),
    }
}

/// Unfinished phases and tasks due within the deadline window, overdue ones
/// included, ordered by date.
fn upcoming_deadlines(phases: &[Phase], today: NaiveDate) -> Vec<Deadline> {
    let horizon = today + Duration::days(DEADLINE_WINDOW_DAYS);
    let mut deadlines = Vec::new();

    for phase in phases {
        if let Some(end) = phase.end_date {
            if end <= horizon && phase.status != PhaseStatus::Completed {
                deadlines.push(Deadline {
                    kind: DeadlineKind::Phase,
                    name: phase.name.clone(),
                    date: end,
                    days_remaining: (end - today).num_days(),
                    priority: Priority::High,
                    category: None,
                });
            }
        }

        for task in phase.tasks.iter().filter(|t| !t.completed) {
            if let Some(due) = task.due_date.filter(|d| *d <= horizon) {
                deadlines.push(Deadline {
                    kind: DeadlineKind::Task,
                    name: task.task.clone(),
                    date: due,
                    days_remaining: (due - today).num_days(),
                    priority: task.priority,
                    category: Some(task.category.clone()),
                });
            }
        }
    }

    deadlines.sort_by_key(|d| d.date);
    deadlines
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::generator::{generate_checklist_at, update_task_status_at};
    use crate::task::ReleaseConfiguration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn single(release: Option<NaiveDate>) -> Checklist {
        let mut config = ReleaseConfiguration::new(ReleaseType::Single).with_artist_level("established");
        config.release_date = release;
        generate_checklist_at(&config, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()).unwrap()
    }

    #[test]
    fn test_overall_and_phase_stats() {
        let checklist = single(None);
        let checklist = update_task_status_at(&checklist, "track_finalization", true, None, checklist.created_at)
            .unwrap();
        let analytics = generate_analytics_at(&checklist, date(2026, 3, 2));

        assert_eq!(analytics.overall.total_tasks, 22);
        assert_eq!(analytics.overall.completed_tasks, 1);
        assert_eq!(analytics.overall.progress, 5);
        assert_eq!(analytics.by_phase.len(), 5);
        assert_eq!(analytics.by_phase[0].name, "Pre-Production");
        assert_eq!(analytics.by_phase[0].completed_count, 1);
        assert_eq!(analytics.by_phase[0].progress, 20);
        assert_eq!(analytics.by_phase[0].days_remaining, None);

        let total_hours: u32 = checklist.tasks().map(|t| t.estimated_hours).sum();
        assert_eq!(analytics.overall.estimated_hours_remaining, total_hours - 8);
    }

    #[test]
    fn test_category_and_priority_breakdown() {
        let analytics = generate_analytics_at(&single(None), date(2026, 3, 2));
        assert_eq!(analytics.by_category["marketing"], CategoryStats { total: 5, completed: 0 });
        assert_eq!(analytics.by_category["legal"].total, 2);
        let p = &analytics.by_priority;
        assert_eq!(p.high + p.medium + p.low, 22);
        assert_eq!(p.low, 2);
    }

    #[test]
    fn test_empty_checklist_has_zero_progress() {
        let mut checklist = single(None);
        for phase in checklist.phases.iter_mut() {
            phase.tasks.clear();
        }
        checklist.recount();
        let analytics = generate_analytics_at(&checklist, date(2026, 3, 2));
        assert_eq!(analytics.overall.progress, 0);
        assert!(analytics.by_phase.iter().all(|p| p.progress == 0));
    }

    #[test]
    fn test_analytics_is_idempotent() {
        let checklist = single(Some(date(2026, 4, 20)));
        let today = date(2026, 3, 2);
        assert_eq!(generate_analytics_at(&checklist, today), generate_analytics_at(&checklist, today));
    }

    #[test]
    fn test_upcoming_deadlines_window() {
        // Release in five weeks: the Pre-Release phase starts one week out.
        let today = date(2026, 3, 2);
        let checklist = single(Some(today + Duration::days(35)));
        let checklist = update_task_status_at(&checklist, "split_sheets", true, None, checklist.created_at)
            .unwrap();
        let deadlines = generate_analytics_at(&checklist, today).upcoming_deadlines;

        assert!(deadlines.windows(2).all(|w| w[0].date <= w[1].date));
        assert!(deadlines.iter().all(|d| d.date <= today + Duration::days(DEADLINE_WINDOW_DAYS)));
        assert!(deadlines.iter().any(|d| d.kind == DeadlineKind::Phase && d.name == "Pre-Production"));
        assert!(deadlines.iter().any(|d| d.kind == DeadlineKind::Task && d.name.starts_with("Submit release")));
        assert!(!deadlines.iter().any(|d| d.name == "Create and verify split sheets"));
        assert!(!deadlines.iter().any(|d| d.name == "Release Week"));

        let overdue = deadlines.iter().find(|d| d.name == "Pre-Production").unwrap();
        assert_eq!(overdue.days_remaining, -7);
    }
}
