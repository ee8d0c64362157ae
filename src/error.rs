//! Error types for checklist generation, mutation, export and storage.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ChecklistError>;

/// Failures surfaced to callers. All of them are recoverable input or I/O
/// errors; none leave a partially built checklist behind.
#[derive(Error, Debug)]
pub enum ChecklistError {
    /// Release type outside `single`, `ep`, `album`.
    #[error("Unsupported release type: {0}")]
    UnsupportedReleaseType(String),

    /// Release date that does not parse as a calendar date.
    #[error("Invalid release date: {0}")]
    InvalidDate(String),

    #[error("Task with ID {0} not found")]
    TaskNotFound(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Custom task targeting a phase the template does not define.
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    #[error("Duplicate task ID: {0}")]
    DuplicateTaskId(String),

    #[error("Checklist '{0}' not found")]
    ChecklistNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
