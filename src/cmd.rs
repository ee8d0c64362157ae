//! Command implementations for the CLI interface.
//!
//! Each subcommand loads what it needs from a `ChecklistStore`, calls into the
//! library and writes the result. Failures bubble up to `main`, which reports
//! them and exits non-zero.

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use clap_complete::Shell;
use tracing::info;

use release_checklist::analytics::generate_analytics;
use release_checklist::assistant::{checklist_prompt, AssistantRouter, CommandGenerator};
use release_checklist::generator::{
    generate_checklist, local_today, milestones, parse_release_date, update_task_status,
};
use release_checklist::store::{sanitize_checklist_name, ChecklistStore};
use release_checklist::{export_checklist, Checklist, CustomTask, ExportFormat, ReleaseConfiguration, ReleaseType};

pub type CmdResult = Result<(), Box<dyn Error>>;

#[derive(Subcommand)]
pub enum Commands {
    /// Generate and store a new release checklist.
    New {
        /// Name to store the checklist under.
        name: String,
        /// Release type: single | ep | album.
        #[arg(long = "type", default_value = "single")]
        release_type: String,
        /// Release date: YYYY-MM-DD, "today", "tomorrow", or "in Nd" / "in Nw" / "in Nm".
        #[arg(long)]
        date: Option<String>,
        /// Task categories to leave out. May be repeated. Accepts comma-separated.
        #[arg(long = "exclude")]
        exclude: Vec<String>,
        /// Extra task as PHASE:ID:TASK[:PRIORITY]. May be repeated.
        #[arg(long = "custom")]
        custom: Vec<String>,
        /// Artist level: independent | emerging | established.
        #[arg(long, default_value = "independent")]
        level: String,
        /// Overwrite an existing checklist with the same name.
        #[arg(long)]
        force: bool,
    },

    /// List stored checklists.
    List,

    /// Show a checklist grouped by phase.
    Show {
        name: String,
    },

    /// Mark a task done (or reopen it) and optionally attach notes.
    Update {
        name: String,
        /// Task ID as shown by `show`.
        task_id: String,
        /// Mark the task not done instead.
        #[arg(long)]
        reopen: bool,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Print completion analytics as JSON.
    Analytics {
        name: String,
    },

    /// List phase milestones.
    Milestones {
        name: String,
    },

    /// Export a checklist as json, csv or markdown.
    Export {
        name: String,
        #[arg(long, short, default_value = "markdown")]
        format: String,
        /// Output file path (default: stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Delete a stored checklist.
    Delete {
        name: String,
    },

    /// Ask an assistant about a checklist.
    Ask {
        name: String,
        question: String,
        /// Assistant command reading the prompt on stdin. Repeat for fallbacks, tried in order.
        #[arg(long = "provider-cmd", required = true)]
        provider_cmd: Vec<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Generate a checklist from command-line options and store it.
#[allow(clippy::too_many_arguments)]
pub fn cmd_new(
    store: &mut impl ChecklistStore,
    out: &mut impl Write,
    name: &str,
    release_type: &str,
    date: Option<&str>,
    exclude: &[String],
    custom: &[String],
    level: String,
    force: bool,
) -> CmdResult {
    let key = checked_name(name)?;
    if !force && store.exists(&key)? {
        return Err(format!("Checklist '{}' already exists (use --force to replace it)", key).into());
    }

    let release_type: ReleaseType = release_type.parse()?;
    let mut config = ReleaseConfiguration::new(release_type).with_artist_level(level);
    if let Some(d) = date {
        config.release_date = Some(parse_release_date(d, local_today())?);
    }
    config.exclude_categories = split_and_normalise_categories(exclude);
    for spec in custom {
        config.custom_tasks.push(CustomTask::parse_spec(spec)?);
    }

    let checklist = generate_checklist(&config)?;
    store.save(&key, &checklist)?;
    info!(name = %key, total_tasks = checklist.total_tasks, "created checklist");

    writeln!(
        out,
        "Created {} checklist '{}' with {} task(s)",
        checklist.release_type, key, checklist.total_tasks
    )?;
    Ok(())
}

/// List stored checklists with their progress.
pub fn cmd_list(store: &impl ChecklistStore, out: &mut impl Write) -> CmdResult {
    let names = store.list()?;
    if names.is_empty() {
        writeln!(out, "No checklists yet. Create one with `rcl new <name>`.")?;
        return Ok(());
    }
    writeln!(out, "{:<24} {:<16} {:<12} {}", "Name", "Type", "Release", "Progress")?;
    for name in names {
        let c = store.load(&name)?;
        writeln!(
            out,
            "{:<24} {:<16} {:<12} {}% ({}/{})",
            truncate(&name, 24),
            c.release_type,
            c.release_date.map(|d| d.to_string()).unwrap_or_else(|| "TBD".into()),
            c.progress(),
            c.completed_tasks,
            c.total_tasks
        )?;
    }
    Ok(())
}

/// Print a checklist as a table per phase.
pub fn cmd_show(store: &impl ChecklistStore, out: &mut impl Write, name: &str) -> CmdResult {
    let checklist = store.load(name)?;
    print_checklist(out, &checklist, local_today())?;
    Ok(())
}

/// Update a task's status and store the new checklist value.
pub fn cmd_update(
    store: &mut impl ChecklistStore,
    out: &mut impl Write,
    name: &str,
    task_id: &str,
    reopen: bool,
    notes: Option<&str>,
) -> CmdResult {
    let checklist = store.load(name)?;
    let updated = update_task_status(&checklist, task_id, !reopen, notes)?;
    store.save(name, &updated)?;
    info!(name, task_id, completed = !reopen, "updated task");

    writeln!(
        out,
        "{} {} ({}% complete, {}/{})",
        if reopen { "Reopened" } else { "Completed" },
        task_id,
        updated.progress(),
        updated.completed_tasks,
        updated.total_tasks
    )?;
    Ok(())
}

pub fn cmd_analytics(store: &impl ChecklistStore, out: &mut impl Write, name: &str) -> CmdResult {
    let checklist = store.load(name)?;
    let analytics = generate_analytics(&checklist);
    writeln!(out, "{}", serde_json::to_string_pretty(&analytics)?)?;
    Ok(())
}

pub fn cmd_milestones(store: &impl ChecklistStore, out: &mut impl Write, name: &str) -> CmdResult {
    let checklist = store.load(name)?;
    let today = local_today();
    writeln!(out, "{:<24} {:<12} {:<10} {}", "Milestone", "Date", "Tasks", "Done")?;
    for m in milestones(&checklist) {
        writeln!(
            out,
            "{:<24} {:<12} {:<10} {}",
            truncate(&m.name, 24),
            format_due_relative(m.date, today),
            format!("{}/{}", m.completed_task_count, m.task_count),
            if m.completed { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

/// Export a checklist to stdout or a file.
pub fn cmd_export(
    store: &impl ChecklistStore,
    out: &mut impl Write,
    name: &str,
    format: &str,
    output: Option<PathBuf>,
) -> CmdResult {
    let format: ExportFormat = format.parse()?;
    let checklist = store.load(name)?;
    let data = export_checklist(&checklist, format)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &data)?;
            eprintln!("Exported {} tasks to {} ({})", checklist.total_tasks, path.display(), format.content_type());
        }
        None => {
            out.write_all(data.as_bytes())?;
            if !data.ends_with('\n') {
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

pub fn cmd_delete(store: &mut impl ChecklistStore, out: &mut impl Write, name: &str) -> CmdResult {
    store.delete(name)?;
    writeln!(out, "Deleted checklist '{}'", sanitize_checklist_name(name))?;
    Ok(())
}

/// Ask the configured assistant commands a question about a checklist.
pub fn cmd_ask(
    store: &impl ChecklistStore,
    out: &mut impl Write,
    name: &str,
    question: &str,
    provider_cmds: &[String],
) -> CmdResult {
    let checklist = store.load(name)?;
    let mut router = AssistantRouter::new();
    for line in provider_cmds {
        match CommandGenerator::from_command_line(line) {
            Some(provider) => router = router.with_provider(provider),
            None => return Err("Empty --provider-cmd".into()),
        }
    }
    let answer = router.route(&checklist_prompt(&checklist, question))?;
    writeln!(out, "{}", answer)?;
    Ok(())
}

/// Print a checklist's phases and tasks in aligned columns.
pub fn print_checklist(out: &mut impl Write, checklist: &Checklist, today: NaiveDate) -> std::io::Result<()> {
    writeln!(
        out,
        "{} - release {} - {}% ({}/{} tasks)",
        checklist.release_type,
        checklist.release_date.map(|d| d.to_string()).unwrap_or_else(|| "TBD".into()),
        checklist.progress(),
        checklist.completed_tasks,
        checklist.total_tasks
    )?;
    for phase in &checklist.phases {
        writeln!(out)?;
        writeln!(out, "{} [{}] {}%", phase.name, phase.status.as_str(), phase.progress())?;
        writeln!(
            out,
            "  {:<4} {:<24} {:<7} {:<10} {:<16} {}",
            "Done", "ID", "Pri", "Due", "Category", "Task"
        )?;
        for t in &phase.tasks {
            writeln!(
                out,
                "  {:<4} {:<24} {:<7} {:<10} {:<16} {}",
                if t.completed { "[x]" } else { "[ ]" },
                truncate(&t.id, 24),
                t.priority.as_str(),
                format_due_relative(t.due_date, today),
                truncate(&t.category, 16),
                t.task
            )?;
        }
    }
    Ok(())
}

fn checked_name(name: &str) -> Result<String, Box<dyn Error>> {
    let key = sanitize_checklist_name(name);
    if key.is_empty() {
        return Err("Checklist name cannot be empty".into());
    }
    Ok(key)
}

/// Normalise a category string by trimming, lowercasing, and replacing spaces with underscores.
pub fn normalise_category(s: &str) -> String {
    s.trim().to_lowercase().replace(' ', "_")
}

/// Split comma-separated category strings and normalise each one.
pub fn split_and_normalise_categories(inputs: &[String]) -> Vec<String> {
    let mut categories = Vec::new();
    for raw in inputs {
        for part in raw.split(',') {
            let category = normalise_category(part);
            if !category.is_empty() {
                categories.push(category);
            }
        }
    }
    categories.sort();
    categories.dedup();
    categories
}

/// Describe a date relative to `today`: "today", "tomorrow", "in 3d", "2d late",
/// or "TBD" for a checklist without a release date.
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(due) = due else {
        return "TBD".to_string();
    };
    match (due - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        days if days < 0 => format!("{}d late", -days),
        days => format!("in {}d", days),
    }
}

/// Clip `s` to `width` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut clipped: String = s.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
