use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Release checklist CLI.
/// Checklists are stored as JSON files in ~/.rcl or the directory given via --store.
#[derive(Parser)]
#[command(name = "rcl", version, about = "Music release checklist generator")]
pub struct Cli {
    /// Directory holding stored checklists.
    #[arg(long, global = true, env = "RCL_STORE")]
    pub store: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
