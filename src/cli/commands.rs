use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("tasklet v", env!("CARGO_PKG_VERSION"), " - a tiny to-do list with reminders"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task file to use (default: tasks.json in the current directory)
    #[arg(short = 'f', long = "file", global = true, env = "TASKLET_FILE")]
    pub file: Option<PathBuf>,

    /// Config file to use instead of ./tasklet.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Show one task with its note
    Show(SelectArgs),
    /// Change a task's title or note
    Edit(EditArgs),
    /// Mark a task done
    Done(SelectArgs),
    /// Mark a task not done
    Undone(SelectArgs),
    /// Delete a task
    Rm(SelectArgs),
    /// Run one reminder scan and print what fired
    Due(DueArgs),
    /// Keep scanning for due tasks until interrupted
    Remind(RemindArgs),
    /// Validate the task file
    Check,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks not yet done
    #[arg(long, conflicts_with = "done")]
    pub pending: bool,
    /// Only tasks already done
    #[arg(long)]
    pub done: bool,
    /// Filter by regex over title, note and date
    #[arg(long)]
    pub search: Option<String>,
}

/// A task selector: 1-based position as shown by `tl list`, or an ID prefix
#[derive(Args)]
pub struct SelectArgs {
    /// Position (1-based) or ID prefix
    pub task: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Free-text note
    #[arg(long)]
    pub note: Option<String>,
    /// Due date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Due time, HH:MM. Only tasks with a time get a reminder.
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Position (1-based) or ID prefix
    pub task: String,
    /// New title
    #[arg(long)]
    pub title: String,
    /// New note (default: keep the current note)
    #[arg(long)]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Reminder command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DueArgs {
    /// Scan at this minute instead of now ("YYYY-MM-DD HH:MM")
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args)]
pub struct RemindArgs {
    /// Seconds between scans (default: reminder.interval_secs from config)
    #[arg(long)]
    pub interval: Option<u64>,
}
