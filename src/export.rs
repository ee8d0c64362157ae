//! Text exports of a checklist: JSON, CSV and Markdown.
//!
//! All exports are deterministic: the same checklist value always renders to
//! the same bytes. Only JSON is lossless.

use chrono::NaiveDate;

use crate::error::Result;
use crate::fields::ExportFormat;
use crate::task::Checklist;

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "Phase,Task,Priority,Category,Due Date,Completed,Notes";

/// Render `checklist` in the requested format.
pub fn export_checklist(checklist: &Checklist, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => export_json(checklist),
        ExportFormat::Csv => Ok(export_csv(checklist)),
        ExportFormat::Markdown => Ok(export_markdown(checklist)),
    }
}

/// Pretty-printed JSON of the whole checklist.
pub fn export_json(checklist: &Checklist) -> Result<String> {
    Ok(serde_json::to_string_pretty(checklist)?)
}

/// Parse a JSON export back into a checklist.
pub fn import_json(data: &str) -> Result<Checklist> {
    Ok(serde_json::from_str(data)?)
}

/// One row per task, phases in order.
pub fn export_csv(checklist: &Checklist) -> String {
    let mut csv = String::new();
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for phase in &checklist.phases {
        for task in &phase.tasks {
            let due = task.due_date.map(|d| d.to_string()).unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                escape_csv(&phase.name),
                escape_csv(&task.task),
                task.priority.as_str(),
                escape_csv(&task.category),
                due,
                if task.completed { "Yes" } else { "No" },
                escape_csv(task.notes.as_deref().unwrap_or("")),
            ));
        }
    }
    csv
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Human-readable rendering with one section per phase and a checkbox per task.
pub fn export_markdown(checklist: &Checklist) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} Checklist\n\n", checklist.release_type));
    md.push_str(&format!("**Release Date:** {}\n", format_date(checklist.release_date)));
    md.push_str(&format!(
        "**Progress:** {}% ({}/{} tasks)\n",
        checklist.progress(),
        checklist.completed_tasks,
        checklist.total_tasks
    ));
    md.push_str(&format!("**Created:** {}\n\n", checklist.created_at.format("%a %b %d %Y")));

    for phase in &checklist.phases {
        md.push_str(&format!("## {}\n\n", phase.name));
        md.push_str(&format!(
            "**Timeline:** {} - {}\n",
            format_date(phase.start_date),
            format_date(phase.end_date)
        ));
        md.push_str(&format!("**Progress:** {}%\n\n", phase.progress()));

        for task in &phase.tasks {
            let checkbox = if task.completed { "[x]" } else { "[ ]" };
            md.push_str(&format!(
                "- {} {} **{}** ({})\n",
                checkbox,
                task.priority.marker(),
                task.task,
                task.category
            ));
            if let Some(due) = task.due_date {
                md.push_str(&format!("  - Due: {}\n", due.format("%a %b %d %Y")));
            }
            if let Some(notes) = &task.notes {
                md.push_str(&format!("  - Notes: {}\n", notes));
            }
        }
        md.push('\n');
    }
    md
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%a %b %d %Y").to_string())
        .unwrap_or_else(|| "TBD".to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::fields::ReleaseType;
    use crate::generator::{generate_checklist_at, update_task_status_at};
    use crate::task::{CustomTask, ReleaseConfiguration};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    fn dated_single() -> Checklist {
        let config = ReleaseConfiguration::new(ReleaseType::Single)
            .with_release_date(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        generate_checklist_at(&config, now()).unwrap()
    }

    #[test]
    fn test_markdown_contains_headings() {
        let checklist = generate_checklist_at(&ReleaseConfiguration::new(ReleaseType::Single), now()).unwrap();
        let md = export_checklist(&checklist, ExportFormat::Markdown).unwrap();
        assert!(md.contains("Single Release"));
        assert!(md.contains("Pre-Production"));
        assert!(md.starts_with("# Single Release Checklist\n"));
        assert!(md.contains("**Release Date:** TBD"));
        assert!(!md.contains("Due:"));
    }

    #[test]
    fn test_markdown_shows_state_due_dates_and_notes() {
        let checklist = update_task_status_at(&dated_single(), "split_sheets", true, Some("Signed by all"), now())
            .unwrap();
        let md = export_markdown(&checklist);
        assert!(md.contains("- [x] 🔴 **Create and verify split sheets** (legal)"));
        assert!(md.contains("- [ ] 🟡 **Register with PRO (ASCAP/BMI/SESAC)** (legal)"));
        assert!(md.contains("  - Due: Fri Mar 06 2026"));
        assert!(md.contains("  - Notes: Signed by all"));
        assert!(md.contains("**Release Date:** Fri May 01 2026"));
        assert!(md.contains("**Progress:** 5% (1/22 tasks)"));
    }

    #[test]
    fn test_markdown_phase_section_layout() {
        let md = export_markdown(&dated_single());
        assert!(md.contains(
            "## Pre-Production\n\n\
             **Timeline:** Fri Mar 06 2026 - Fri Mar 20 2026\n\
             **Progress:** 0%\n\n\
             - [ ] 🔴 **Finalize track selection and arrangement** (production)\n  \
             - Due: Fri Mar 06 2026\n"
        ));
        assert!(md.ends_with("\n\n"));
    }

    #[test]
    fn test_csv_rows() {
        let checklist = dated_single();
        let csv = export_csv(&checklist);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 1 + checklist.total_tasks);
        assert_eq!(
            lines[1],
            "Pre-Production,Finalize track selection and arrangement,high,production,2026-03-06,No,"
        );
    }

    #[test]
    fn test_csv_quotes_awkward_fields() {
        let config = ReleaseConfiguration::new(ReleaseType::Single)
            .with_custom_task(CustomTask::new("Release Week", "thanks", "Thank fans, \"superfans\" first"));
        let checklist = generate_checklist_at(&config, now()).unwrap();
        let checklist = update_task_status_at(&checklist, "custom_thanks", true, Some("a,b"), now()).unwrap();
        let csv = export_csv(&checklist);
        assert!(csv.contains("Release Week,\"Thank fans, \"\"superfans\"\" first\",medium,custom,,Yes,\"a,b\"\n"));
    }

    #[test]
    fn test_json_round_trip() {
        let checklist = update_task_status_at(&dated_single(), "metadata_prep", true, Some("ISRCs issued"), now())
            .unwrap();
        let json = export_checklist(&checklist, ExportFormat::Json).unwrap();
        assert!(json.contains("Single Release"));
        assert!(json.contains("Pre-Production"));
        assert_eq!(import_json(&json).unwrap(), checklist);
    }

    #[test]
    fn test_exports_are_deterministic() {
        let checklist = dated_single();
        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Markdown] {
            assert_eq!(
                export_checklist(&checklist, format).unwrap(),
                export_checklist(&checklist, format).unwrap()
            );
        }
    }
}
