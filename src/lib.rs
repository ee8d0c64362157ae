//! # Release Checklist
//!
//! Template-driven checklists for independent music releases.
//!
//! Given a [`ReleaseConfiguration`] (single, EP or album, an optional release
//! date, custom tasks and excluded categories) the generator produces a
//! [`Checklist`]: five ordered phases of tasks with due dates counted back
//! from the release date. Checklists are plain values. Updating a task returns
//! a new checklist, analytics and exports only read.
//!
//! ```
//! use chrono::NaiveDate;
//! use release_checklist::{export_checklist, generate_checklist, ExportFormat, ReleaseConfiguration, ReleaseType};
//!
//! let config = ReleaseConfiguration::new(ReleaseType::Single)
//!     .with_release_date(NaiveDate::from_ymd_opt(2026, 11, 20).unwrap())
//!     .excluding("licensing");
//! let checklist = generate_checklist(&config).unwrap();
//! assert_eq!(checklist.phases.len(), 5);
//!
//! let md = export_checklist(&checklist, ExportFormat::Markdown).unwrap();
//! assert!(md.starts_with("# Single Release Checklist"));
//! ```
//!
//! Persistence lives behind [`store::ChecklistStore`], and the optional
//! assistant behind [`assistant::TextGenerator`].

pub mod analytics;
pub mod assistant;
pub mod error;
pub mod export;
pub mod fields;
pub mod generator;
pub mod store;
pub mod task;
pub mod template;

pub use analytics::{generate_analytics, generate_analytics_at, Analytics};
pub use error::{ChecklistError, Result};
pub use export::export_checklist;
pub use fields::{ExportFormat, PhaseStatus, Priority, ReleaseType};
pub use generator::{
    calculate_due_date, generate_checklist, generate_checklist_at, milestones, update_task_status,
    update_task_status_at,
};
pub use task::{Checklist, CustomTask, Milestone, Phase, ReleaseConfiguration, Task};
