//! Checklist data structures.
//!
//! This module defines the release configuration a checklist is generated from
//! and the `Checklist` value itself: ordered phases, each holding ordered tasks
//! with priority, category, completion state, due date and notes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result as ChecklistResult;
use crate::fields::*;

/// Default artist level applied when a configuration does not name one.
pub const DEFAULT_ARTIST_LEVEL: &str = "independent";

/// Caller-supplied input to checklist generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseConfiguration {
    pub release_type: ReleaseType,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub custom_tasks: Vec<CustomTask>,
    #[serde(default)]
    pub exclude_categories: Vec<String>,
    #[serde(default = "default_artist_level")]
    pub artist_level: String,
}

fn default_artist_level() -> String {
    DEFAULT_ARTIST_LEVEL.to_string()
}

impl ReleaseConfiguration {
    /// A configuration with no date, no customisation and the default artist level.
    pub fn new(release_type: ReleaseType) -> Self {
        ReleaseConfiguration {
            release_type,
            release_date: None,
            custom_tasks: Vec::new(),
            exclude_categories: Vec::new(),
            artist_level: default_artist_level(),
        }
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn with_custom_task(mut self, task: CustomTask) -> Self {
        self.custom_tasks.push(task);
        self
    }

    pub fn excluding(mut self, category: impl Into<String>) -> Self {
        self.exclude_categories.push(category.into());
        self
    }

    pub fn with_artist_level(mut self, level: impl Into<String>) -> Self {
        self.artist_level = level.into();
        self
    }

    /// Read a configuration from JSON. An unknown `release_type` is reported
    /// as `UnsupportedReleaseType` rather than as a JSON error.
    pub fn from_json(data: &str) -> ChecklistResult<Self> {
        let value: serde_json::Value = serde_json::from_str(data)?;
        if let Some(label) = value.get("release_type").and_then(|v| v.as_str()) {
            label.parse::<ReleaseType>()?;
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// A task the caller wants merged into a named template phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTask {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
    pub phase: String,
}

impl CustomTask {
    pub fn new(phase: impl Into<String>, id: impl Into<String>, task: impl Into<String>) -> Self {
        CustomTask {
            id: id.into(),
            task: task.into(),
            priority: Priority::default(),
            category: None,
            phase: phase.into(),
        }
    }

    /// Parse the command-line form `PHASE:ID:TASK[:PRIORITY]`.
    ///
    /// The task text may itself contain colons; the last segment is taken as
    /// the priority only when it names one.
    pub fn parse_spec(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.splitn(3, ':').map(str::trim).collect();
        if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(format!("expected PHASE:ID:TASK[:PRIORITY], got '{}'", s));
        }

        let (task, priority) = match parts[2].rsplit_once(':') {
            Some((text, label)) if !text.trim().is_empty() => match label.parse::<Priority>() {
                Ok(priority) => (text.trim(), priority),
                Err(_) => (parts[2], Priority::default()),
            },
            _ => (parts[2], Priority::default()),
        };

        let mut custom = CustomTask::new(parts[0], parts[1], task);
        custom.priority = priority;
        Ok(custom)
    }
}

/// A single checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub task: String,
    pub priority: Priority,
    pub category: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub estimated_hours: u32,
}

/// A named, ordered group of tasks covering a stretch of the release timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub name: String,
    /// Week offsets relative to the release date.
    pub start_week: i64,
    pub end_week: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: PhaseStatus,
    pub tasks: Vec<Task>,
}

impl Phase {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Rounded completion percentage, 0 for an empty phase.
    pub fn progress(&self) -> u32 {
        percent(self.completed_count(), self.task_count())
    }
}

/// A generated release checklist. Operations never mutate a checklist in
/// place; they return a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    /// Human-readable label such as "Single Release".
    pub release_type: String,
    pub kind: ReleaseType,
    pub timeline_weeks: u32,
    pub release_date: Option<NaiveDate>,
    pub artist_level: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    pub phases: Vec<Phase>,
    pub total_tasks: usize,
    pub completed_tasks: usize,
}

impl Checklist {
    /// Recompute `total_tasks` and `completed_tasks` from the phase set.
    pub fn recount(&mut self) {
        self.total_tasks = self.phases.iter().map(Phase::task_count).sum();
        self.completed_tasks = self.phases.iter().map(Phase::completed_count).sum();
    }

    /// Rounded whole-checklist completion percentage, 0 when there are no tasks.
    pub fn progress(&self) -> u32 {
        percent(self.completed_tasks, self.total_tasks)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.phases.iter().flat_map(|p| p.tasks.iter())
    }

    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks().find(|t| t.id == id)
    }

    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }
}

/// A phase-level checkpoint on the release timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub completed: bool,
    pub task_count: usize,
    pub completed_task_count: usize,
    pub description: String,
}

/// Rounded percentage of `part` in `whole`, 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChecklistError;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(4, 4), 100);
    }

    #[test]
    fn test_custom_task_spec_parsing() {
        let t = CustomTask::parse_spec("Pre-Release:tiktok:Plan TikTok teasers:high").unwrap();
        assert_eq!(t.phase, "Pre-Release");
        assert_eq!(t.id, "tiktok");
        assert_eq!(t.task, "Plan TikTok teasers");
        assert_eq!(t.priority, Priority::High);

        let t = CustomTask::parse_spec("Release Week:party:Listening party").unwrap();
        assert_eq!(t.priority, Priority::Medium);

        assert!(CustomTask::parse_spec("Release Week:party").is_err());
        assert!(CustomTask::parse_spec("Release Week::Listening party").is_err());
        assert!(CustomTask::parse_spec("Release Week:party:").is_err());
    }

    #[test]
    fn test_custom_task_text_may_contain_colons() {
        let t = CustomTask::parse_spec("Pre-Release:x:Note: teaser").unwrap();
        assert_eq!(t.task, "Note: teaser");
        assert_eq!(t.priority, Priority::Medium);

        let t = CustomTask::parse_spec("Pre-Release:x:Note: teaser:low").unwrap();
        assert_eq!(t.task, "Note: teaser");
        assert_eq!(t.priority, Priority::Low);

        let t = CustomTask::parse_spec("Release Week:party:Listening party:asap").unwrap();
        assert_eq!(t.task, "Listening party:asap");
        assert_eq!(t.priority, Priority::Medium);
    }

    #[test]
    fn test_configuration_defaults_from_json() {
        let config: ReleaseConfiguration =
            serde_json::from_str(r#"{ "release_type": "ep" }"#).unwrap();
        assert_eq!(config, ReleaseConfiguration::new(ReleaseType::Ep));
        assert_eq!(config.artist_level, "independent");
    }

    #[test]
    fn test_configuration_with_unknown_release_type() {
        match ReleaseConfiguration::from_json(r#"{ "release_type": "mixtape" }"#) {
            Err(ChecklistError::UnsupportedReleaseType(label)) => assert_eq!(label, "mixtape"),
            other => panic!("expected unsupported release type, got {:?}", other),
        }

        let config = ReleaseConfiguration::from_json(r#"{ "release_type": "Album", "exclude_categories": ["legal"] }"#)
            .unwrap();
        assert_eq!(config, ReleaseConfiguration::new(ReleaseType::Album).excluding("legal"));
        assert!(matches!(ReleaseConfiguration::from_json("{"), Err(ChecklistError::Json(_))));
    }
}
