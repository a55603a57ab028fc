use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::io::task_io;
use crate::model::config::Config;
use crate::model::task::{Due, SHORT_ID_LEN, Task};
use crate::ops::reminder::{self, ReminderClock};
use crate::ops::{check, search, task_ops};
use crate::store::TaskStore;

/// Resolved configuration and data file for one invocation
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: Config,
    pub data_file: PathBuf,
}

impl Workspace {
    /// Load config (explicit path or `./tasklet.toml`) and pick the data file.
    pub fn resolve(file: Option<&Path>, config: Option<&Path>) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let config = config_io::load_config(config, &cwd)?;
        let data_file = config_io::resolve_data_file(file, &config, &cwd);
        Ok(Workspace { config, data_file })
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let ws = Workspace::resolve(cli.file.as_deref(), cli.config.as_deref())?;

    match cli.command {
        None => Err("no command given (run `tl` without arguments for the TUI)".into()),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&ws, args, json),
            Commands::Show(args) => cmd_show(&ws, args, json),
            Commands::Check => cmd_check(&ws, json),

            // Write commands
            Commands::Add(args) => cmd_add(&ws, args, json),
            Commands::Edit(args) => cmd_edit(&ws, args),
            Commands::Done(args) => cmd_set_done(&ws, args, true),
            Commands::Undone(args) => cmd_set_done(&ws, args, false),
            Commands::Rm(args) => cmd_rm(&ws, args),

            // Reminders
            Commands::Due(args) => cmd_due(&ws, args, json),
            Commands::Remind(args) => cmd_remind(&ws, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the store, reporting a load fallback on stderr.
fn open_store(ws: &Workspace) -> TaskStore {
    let (store, err) = TaskStore::open(ws.data_file.clone());
    if let Some(e) = err {
        eprintln!("warning: {} (starting with an empty list)", e);
    }
    store
}

/// How a selector picked its task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    /// 0-based index from a 1-based position argument
    Position(usize),
    /// Full ID from a unique ID prefix
    Id(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no task matches '{0}'")]
    NoMatch(String),
    #[error("'{selector}' matches {count} tasks, use a longer ID prefix")]
    Ambiguous { selector: String, count: usize },
}

/// Resolve a selector: a number shorter than a short ID is a 1-based
/// position, anything else an ID prefix that must be unique. Short IDs made
/// only of digits therefore still select by ID.
pub fn resolve_selector(tasks: &[Task], selector: &str) -> Result<Selected, SelectError> {
    let selector = selector.trim();
    if selector.len() < SHORT_ID_LEN
        && let Ok(n) = selector.parse::<usize>()
    {
        return if n >= 1 && n <= tasks.len() {
            Ok(Selected::Position(n - 1))
        } else {
            Err(SelectError::NoMatch(selector.to_string()))
        };
    }
    if selector.is_empty() {
        return Err(SelectError::NoMatch(selector.to_string()));
    }
    let prefix = selector.to_ascii_lowercase();
    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(&prefix)).collect();
    match matches.as_slice() {
        [] => Err(SelectError::NoMatch(selector.to_string())),
        [task] => Ok(Selected::Id(task.id.clone())),
        _ => Err(SelectError::Ambiguous {
            selector: selector.to_string(),
            count: matches.len(),
        }),
    }
}

/// Selector to 0-based index, whichever form was used
fn select_index(store: &TaskStore, selector: &str) -> Result<usize, SelectError> {
    match resolve_selector(store.tasks(), selector)? {
        Selected::Position(i) => Ok(i),
        Selected::Id(id) => store
            .position(&id)
            .ok_or_else(|| SelectError::NoMatch(selector.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ws: &Workspace, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(ws);

    let matching = match args.search.as_deref().and_then(search::compile_pattern) {
        Some(re) => Some(search::matching_ids(store.tasks(), &re)),
        None => None,
    };

    let selected: Vec<(usize, &Task)> = store
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, t)| (i + 1, t))
        .filter(|(_, t)| !(args.pending && t.done) && !(args.done && !t.done))
        .filter(|(_, t)| matching.as_ref().is_none_or(|ids| ids.contains(&t.id)))
        .collect();

    if json {
        let out: Vec<TaskJson> = selected
            .iter()
            .map(|(pos, t)| task_to_json(*pos, t))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if selected.is_empty() {
        println!("(no tasks)");
    } else {
        for (pos, task) in &selected {
            println!("{}", format_task_line(*pos, task));
        }
    }
    Ok(())
}

fn cmd_show(ws: &Workspace, args: SelectArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(ws);
    let index = select_index(&store, &args.task)?;
    let task = &store.tasks()[index];

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(index + 1, task))?);
    } else {
        for line in format_task_detail(index + 1, task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_check(ws: &Workspace, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Strict load: a file that does not parse is the first thing to report
    let tasks = task_io::load_tasks(&ws.data_file)?;
    let result = check::check_tasks(&tasks, Local::now().naive_local());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    check::CheckError::EmptyTitle { position, task_id } => {
                        println!("  {:>3} ({}) has an empty title", position, task_id);
                    }
                    check::CheckError::InvalidDate {
                        position,
                        task_id,
                        date,
                    } => {
                        println!("  {:>3} ({}) has an invalid date: \"{}\"", position, task_id, date);
                    }
                    check::CheckError::DuplicateId { task_id, positions } => {
                        let positions: Vec<String> =
                            positions.iter().map(|p| p.to_string()).collect();
                        println!(
                            "  {} is duplicated at positions: {}",
                            task_id,
                            positions.join(", ")
                        );
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    check::CheckWarning::NotifiedWithoutTime { position, task_id } => {
                        println!(
                            "  {:>3} ({}) is marked notified but has no due time",
                            position, task_id
                        );
                    }
                    check::CheckWarning::NotifiedBeforeDue {
                        position,
                        task_id,
                        date,
                    } => {
                        println!(
                            "  {:>3} ({}) is marked notified before its due minute {}",
                            position, task_id, date
                        );
                    }
                }
            }
        }
        if result.valid && result.warnings.is_empty() {
            println!("✓ {} is valid ({} tasks)", ws.data_file.display(), tasks.len());
        } else {
            println!("✗ {} has issues", ws.data_file.display());
        }
    }

    let issues = result.errors.len() + result.warnings.len();
    if issues > 0 {
        return Err(format!("{} issue(s) found", issues).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(ws: &Workspace, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let title = task_ops::validate_title(&args.title)?.to_string();
    let date_field = args.date.unwrap_or_else(task_ops::today_str);
    let date = task_ops::compose_date(&date_field, args.time.as_deref())?;
    let note = args.note.unwrap_or_default();

    let mut store = open_store(ws);
    let id = store
        .add(&title, &note, &date)
        .ok_or(task_ops::ValidationError::EmptyTitle)?;
    store.save()?;

    if json {
        let out = AddedJson {
            id,
            position: store.len(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_edit(ws: &Workspace, args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let title = task_ops::validate_title(&args.title)?.to_string();
    let mut store = open_store(ws);
    let index = select_index(&store, &args.task)?;
    let note = args
        .note
        .unwrap_or_else(|| store.tasks()[index].note.clone());

    store.edit_at(index, &title, &note);
    store.save()?;
    println!("{} updated", store.tasks()[index].short_id());
    Ok(())
}

fn cmd_set_done(
    ws: &Workspace,
    args: SelectArgs,
    done: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(ws);
    let index = select_index(&store, &args.task)?;
    let id = store.tasks()[index].id.clone();
    let short = store.tasks()[index].short_id().to_string();

    store.set_done(&id, done);
    store.save()?;
    if done {
        println!("{} done", short);
    } else {
        println!("{} not done", short);
    }
    Ok(())
}

fn cmd_rm(ws: &Workspace, args: SelectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(ws);
    let removed = match resolve_selector(store.tasks(), &args.task)? {
        Selected::Position(i) => store.delete_at(i),
        Selected::Id(id) => store.remove(&id),
    }
    .ok_or_else(|| SelectError::NoMatch(args.task.clone()))?;

    store.save()?;
    println!("deleted {} \"{}\"", removed.short_id(), removed.title);
    Ok(())
}

// ---------------------------------------------------------------------------
// Reminder handlers
// ---------------------------------------------------------------------------

/// Parse `--at`. It has to name a minute: date-only values never fire.
fn parse_scan_stamp(at: &str) -> Result<String, String> {
    match Due::parse(at.trim()) {
        Some(due @ Due::Minute(_)) => Ok(due.to_string()),
        _ => Err(format!(
            "invalid --at '{}', expected YYYY-MM-DD HH:MM",
            at.trim()
        )),
    }
}

fn print_reminders(
    reminders: &[reminder::Reminder],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        for r in reminders {
            println!("{}", serde_json::to_string(&reminder_to_json(r))?);
        }
    } else {
        for r in reminders {
            println!("{}  {}", r.date, r.message());
        }
    }
    Ok(())
}

fn cmd_due(ws: &Workspace, args: DueArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stamp = match args.at.as_deref() {
        Some(at) => parse_scan_stamp(at)?,
        None => reminder::local_now_stamp(),
    };

    let mut store = open_store(ws);
    let fired = store.fire_reminders(&stamp);
    if !fired.is_empty() {
        store.save()?;
    }

    if json {
        let out: Vec<ReminderJson> = fired.iter().map(reminder_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if fired.is_empty() {
        println!("(nothing due at {})", stamp);
    } else {
        print_reminders(&fired, false)?;
    }
    Ok(())
}

fn cmd_remind(ws: &Workspace, args: RemindArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let interval = Duration::from_secs(args.interval.unwrap_or(ws.config.reminder.interval_secs));
    let mut clock = ReminderClock::new(interval);
    let mut store = open_store(ws);
    eprintln!(
        "watching {} every {}s (Ctrl-C to stop)",
        ws.data_file.display(),
        clock.interval().as_secs()
    );

    loop {
        if clock.is_due(Instant::now()) {
            // Pick up edits made by other tl invocations since the last scan
            if let Some(err) = store.reload() {
                tracing::warn!(error = %err, "reload failed, skipping scan");
            } else {
                let fired = store.fire_reminders(&reminder::local_now_stamp());
                if !fired.is_empty() {
                    if let Err(e) = store.save() {
                        eprintln!("warning: {}", e);
                    }
                    print_reminders(&fired, json)?;
                }
            }
        }
        thread::sleep(Duration::from_millis(500));
    }
}
