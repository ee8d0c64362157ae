//! Enumerations and field types for release checklists.
//!
//! This module defines the closed sets of values a checklist is built from:
//! release types, task priorities, phase states and export formats, together
//! with their string parsing and display labels.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ChecklistError;

/// The kind of musical release, which selects the template set.
///
/// Deserialisation goes through `FromStr`, so labels are case-insensitive and
/// an unknown label reports `UnsupportedReleaseType`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ReleaseType {
    Single,
    Ep,
    Album,
}

impl ReleaseType {
    /// All supported release types, in catalog order.
    pub const ALL: [ReleaseType; 3] = [ReleaseType::Single, ReleaseType::Ep, ReleaseType::Album];

    /// The label used on the command line and in release configurations.
    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseType::Single => "single",
            ReleaseType::Ep => "ep",
            ReleaseType::Album => "album",
        }
    }
}

impl FromStr for ReleaseType {
    type Err = ChecklistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(ReleaseType::Single),
            "ep" => Ok(ReleaseType::Ep),
            "album" => Ok(ReleaseType::Album),
            _ => Err(ChecklistError::UnsupportedReleaseType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReleaseType {
    type Error = ChecklistError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority classification for a checklist task. Display only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Marker used in the Markdown export.
    pub fn marker(self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{}' (expected low, medium or high)", other)),
        }
    }
}

/// Progress state of a phase, derived from its tasks and start date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

impl PhaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseStatus::Upcoming => "upcoming",
            PhaseStatus::Active => "active",
            PhaseStatus::Completed => "completed",
        }
    }
}

/// Text serialisations a checklist can be exported to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    /// MIME type a front end should attach to the exported body.
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Markdown => "text/markdown",
        }
    }

    /// Conventional file extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ChecklistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(ChecklistError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Whether an upcoming deadline belongs to a whole phase or a single task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeadlineKind {
    Phase,
    Task,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_type_parsing() {
        assert_eq!("single".parse::<ReleaseType>().unwrap(), ReleaseType::Single);
        assert_eq!("EP".parse::<ReleaseType>().unwrap(), ReleaseType::Ep);
        assert_eq!(" album ".parse::<ReleaseType>().unwrap(), ReleaseType::Album);

        match "mixtape".parse::<ReleaseType>() {
            Err(ChecklistError::UnsupportedReleaseType(label)) => assert_eq!(label, "mixtape"),
            other => panic!("expected unsupported release type, got {:?}", other),
        }
    }

    #[test]
    fn test_release_type_deserialises_through_from_str() {
        assert_eq!(serde_json::from_str::<ReleaseType>("\"EP\"").unwrap(), ReleaseType::Ep);
        assert_eq!(serde_json::to_string(&ReleaseType::Album).unwrap(), "\"album\"");

        let err = serde_json::from_str::<ReleaseType>("\"mixtape\"").unwrap_err();
        assert!(err.to_string().starts_with("Unsupported release type: mixtape"), "{}", err);
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!(ExportFormat::Csv.content_type(), "text/csv");
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ChecklistError::UnsupportedFormat(f)) if f == "pdf"
        ));
    }

    #[test]
    fn test_priority_serde_labels() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(Priority::default(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
