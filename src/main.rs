//! # rcl - Release Checklist CLI
//!
//! Generates and tracks release checklists for independent music releases.
//! A checklist is built from the template for a single, EP or album, dated
//! backwards from the release date, and stored as a JSON file so progress can
//! be tracked over the weeks leading up to and after the release.
//!
//! ## Quick Start
//!
//! ```bash
//! # Plan a single releasing in eight weeks, without the licensing tasks
//! rcl new "summer single" --type single --date "in 8w" --exclude licensing
//!
//! # See what is due
//! rcl show "summer single"
//!
//! # Tick off a task
//! rcl update "summer single" split_sheets --notes "Signed by all writers"
//!
//! # Share it
//! rcl export "summer single" --format markdown -o summer-single.md
//! ```
//!
//! Data is stored in `~/.rcl/` (or `$RCL_STORE`, or `--store`) with each
//! checklist as a separate `<name>_checklist.json` file.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use release_checklist::store::JsonFileStore;

pub mod cli;
pub mod cmd;

use cli::Cli;
use cmd::*;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    // Completions need no store.
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "rcl", &mut io::stdout());
        return;
    }

    let store_dir = cli.store.clone().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".rcl")
    });
    let mut store = match JsonFileStore::open(&store_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open checklist store {}: {}", store_dir.display(), e);
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::New { name, release_type, date, exclude, custom, level, force } =>
            cmd_new(&mut store, &mut out, &name, &release_type, date.as_deref(), &exclude, &custom, level, force),

        Commands::List => cmd_list(&store, &mut out),

        Commands::Show { name } => cmd_show(&store, &mut out, &name),

        Commands::Update { name, task_id, reopen, notes } =>
            cmd_update(&mut store, &mut out, &name, &task_id, reopen, notes.as_deref()),

        Commands::Analytics { name } => cmd_analytics(&store, &mut out, &name),

        Commands::Milestones { name } => cmd_milestones(&store, &mut out, &name),

        Commands::Export { name, format, output } => cmd_export(&store, &mut out, &name, &format, output),

        Commands::Delete { name } => cmd_delete(&mut store, &mut out, &name),

        Commands::Ask { name, question, provider_cmd } =>
            cmd_ask(&store, &mut out, &name, &question, &provider_cmd),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
