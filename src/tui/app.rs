use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use regex::Regex;

use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::task_io::StoreError;
use crate::io::watcher::TaskFileWatcher;
use crate::model::config::Config;
use crate::model::task::Task;
use crate::ops::reminder::{self, ReminderClock};
use crate::ops::search;
use crate::ops::task_ops;
use crate::store::TaskStore;
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    /// Add/edit form popup is open
    Form,
    /// Delete confirmation popup is open
    Confirm,
}

/// A line in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Transient, cleared by the next key press
    Info(String),
    /// Stays until the next successful save or reload
    Warning(String),
}

// ---------------------------------------------------------------------------
// Task form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Note,
    Date,
    Time,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Note => "Note",
            FormField::Date => "Date",
            FormField::Time => "Time",
        }
    }
}

const ADD_FIELDS: &[FormField] = &[
    FormField::Title,
    FormField::Note,
    FormField::Date,
    FormField::Time,
];
const EDIT_FIELDS: &[FormField] = &[FormField::Title, FormField::Note];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Add,
    /// Editing title and note of an existing task; the date is read-only
    Edit { task_id: String },
}

/// State of the add/edit popup. `cursor` is a byte offset into the active field.
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub field: FormField,
    pub title: String,
    pub note: String,
    pub date: String,
    pub time: String,
    pub cursor: usize,
}

impl FormState {
    /// Empty add form, date prefilled
    pub fn for_add(date: String) -> Self {
        FormState {
            kind: FormKind::Add,
            field: FormField::Title,
            title: String::new(),
            note: String::new(),
            date,
            time: String::new(),
            cursor: 0,
        }
    }

    pub fn for_edit(task: &Task) -> Self {
        FormState {
            kind: FormKind::Edit {
                task_id: task.id.clone(),
            },
            field: FormField::Title,
            title: task.title.clone(),
            note: task.note.clone(),
            date: task.date.clone(),
            time: String::new(),
            cursor: task.title.len(),
        }
    }

    /// Editable fields in tab order
    pub fn fields(&self) -> &'static [FormField] {
        match self.kind {
            FormKind::Add => ADD_FIELDS,
            FormKind::Edit { .. } => EDIT_FIELDS,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Note => &self.note,
            FormField::Date => &self.date,
            FormField::Time => &self.time,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Note => &mut self.note,
            FormField::Date => &mut self.date,
            FormField::Time => &mut self.time,
        }
    }

    /// Move to the next (`forward`) or previous field, wrapping around
    pub fn cycle_field(&mut self, forward: bool) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.field = fields[next];
        self.cursor = self.value(self.field).len();
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        self.active_mut().insert(cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        let cursor = self.cursor;
        let value = self.active_mut();
        if let Some(prev) = unicode::prev_grapheme_boundary(value, cursor) {
            value.replace_range(prev..cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        let cursor = self.cursor;
        let value = self.active_mut();
        if let Some(next) = unicode::next_grapheme_boundary(value, cursor) {
            value.replace_range(cursor..next, "");
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(self.value(self.field), self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(self.value(self.field), self.cursor) {
            self.cursor = next;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value(self.field).len();
    }

    /// Step the date field by days or the time field by minutes.
    /// Other fields are left alone.
    pub fn step(&mut self, delta: i64) {
        let stepped = match self.field {
            FormField::Date => task_ops::step_date(&self.date, delta),
            FormField::Time => task_ops::step_time(&self.time, delta),
            _ => return,
        };
        *self.active_mut() = stepped;
        self.cursor_end();
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Main application state
pub struct App {
    pub store: TaskStore,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the visible task list
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll: usize,
    /// Done tasks hidden from the list
    pub hide_done: bool,
    /// Help overlay visible
    pub show_help: bool,
    /// Search mode: current query being typed
    pub search_input: String,
    /// Last executed search pattern
    pub last_search: Option<String>,
    pub form: Option<FormState>,
    /// Task awaiting delete confirmation
    pub pending_delete: Option<String>,
    /// Blocking message popup (validation failures)
    pub message: Option<String>,
    /// Reminder popup lines; the popup is open while non-empty
    pub reminders: Vec<String>,
    pub status: Option<Status>,
    pub reminder_clock: ReminderClock,
    /// File content as last written or read by this process
    disk_snapshot: Option<String>,
}

impl App {
    pub fn new(store: TaskStore, config: &Config, load_error: Option<StoreError>) -> Self {
        let status = load_error.map(|e| Status::Warning(format!("{} (started empty)", e)));
        let mut app = App {
            store,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            cursor: 0,
            scroll: 0,
            hide_done: config.ui.hide_done,
            show_help: false,
            search_input: String::new(),
            last_search: None,
            form: None,
            pending_delete: None,
            message: None,
            reminders: Vec::new(),
            status,
            reminder_clock: ReminderClock::new(Duration::from_secs(
                config.reminder.interval_secs,
            )),
            disk_snapshot: None,
        };
        app.remember_disk();
        app
    }

    // -- list view ----------------------------------------------------------

    /// Store indices of the tasks shown in the list
    pub fn visible_indices(&self) -> Vec<usize> {
        self.store
            .tasks()
            .iter()
            .enumerate()
            .filter(|(_, t)| !(self.hide_done && t.done))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn cursor_task(&self) -> Option<&Task> {
        let idx = *self.visible_indices().get(self.cursor)?;
        self.store.tasks().get(idx)
    }

    fn cursor_task_id(&self) -> Option<String> {
        self.cursor_task().map(|t| t.id.clone())
    }

    /// Put the cursor on a task, if it is visible
    pub fn select_task(&mut self, id: &str) -> bool {
        let visible = self.visible_indices();
        match visible
            .iter()
            .position(|&i| self.store.tasks()[i].id == id)
        {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.visible_indices().len();
        self.cursor = if count == 0 {
            0
        } else {
            self.cursor.min(count - 1)
        };
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.visible_indices().len();
        if count == 0 {
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, count as isize - 1) as usize;
    }

    pub fn jump_top(&mut self) {
        self.cursor = 0;
    }

    pub fn jump_bottom(&mut self) {
        self.cursor = self.visible_indices().len().saturating_sub(1);
    }

    pub fn toggle_hide_done(&mut self) {
        let keep = self.cursor_task_id();
        self.hide_done = !self.hide_done;
        if !keep.is_some_and(|id| self.select_task(&id)) {
            self.clamp_cursor();
        }
        let msg = if self.hide_done {
            "done tasks hidden"
        } else {
            "showing done tasks"
        };
        self.status = Some(Status::Info(msg.into()));
    }

    // -- persistence --------------------------------------------------------

    fn remember_disk(&mut self) {
        self.disk_snapshot = fs::read_to_string(self.store.path()).ok();
    }

    /// Save after a mutation. Failures become a status warning.
    pub fn save(&mut self) {
        match self.store.save() {
            Ok(()) => {
                if matches!(self.status, Some(Status::Warning(_))) {
                    self.status = None;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.status = Some(Status::Warning(format!("{} (kept in memory)", e)));
            }
        }
        self.remember_disk();
    }

    /// Replace the list with the file's content, keeping the cursor on the same task.
    pub fn reload(&mut self) {
        let keep = self.cursor_task_id();
        let err = self.store.reload();
        self.remember_disk();
        if !keep.is_some_and(|id| self.select_task(&id)) {
            self.clamp_cursor();
        }
        self.status = Some(match err {
            Some(e) => Status::Warning(format!("{} (started empty)", e)),
            None => Status::Info(format!("reloaded {} tasks", self.store.len())),
        });
    }

    /// Called when the watcher reports a change to the data file.
    /// Our own saves are recognised by content and skipped.
    pub fn on_file_changed(&mut self) {
        let current = fs::read_to_string(self.store.path()).ok();
        if current == self.disk_snapshot {
            return;
        }
        tracing::debug!(path = %self.store.path().display(), "data file changed on disk, reloading");
        self.reload();
    }

    // -- mutations ----------------------------------------------------------

    pub fn toggle_done(&mut self) {
        let Some((id, done)) = self.cursor_task().map(|t| (t.id.clone(), t.done)) else {
            return;
        };
        self.store.set_done(&id, !done);
        self.save();
        self.clamp_cursor();
    }

    pub fn open_add_form(&mut self) {
        self.form = Some(FormState::for_add(task_ops::today_str()));
        self.mode = Mode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(form) = self.cursor_task().map(FormState::for_edit) else {
            return;
        };
        self.form = Some(form);
        self.mode = Mode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.mode = Mode::Navigate;
    }

    /// Validate and apply the form. On a validation failure the form stays
    /// open behind a message popup and nothing is changed.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let title = match task_ops::validate_title(&form.title) {
            Ok(t) => t.to_string(),
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        };

        match form.kind.clone() {
            FormKind::Add => {
                let date = match task_ops::compose_date(&form.date, Some(&form.time)) {
                    Ok(d) => d,
                    Err(e) => {
                        self.message = Some(e.to_string());
                        return;
                    }
                };
                let note = form.note.clone();
                if let Some(id) = self.store.add(&title, &note, &date) {
                    self.save();
                    self.select_task(&id);
                }
            }
            FormKind::Edit { task_id } => {
                let note = form.note.clone();
                match self.store.position(&task_id) {
                    Some(index) => {
                        self.store.edit_at(index, &title, &note);
                        self.save();
                    }
                    None => {
                        self.message = Some("this task no longer exists".into());
                        self.close_form();
                        return;
                    }
                }
            }
        }
        self.close_form();
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.cursor_task_id() {
            self.pending_delete = Some(id);
            self.mode = Mode::Confirm;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            if let Some(removed) = self.store.remove(&id) {
                self.save();
                self.status = Some(Status::Info(format!("deleted \"{}\"", removed.title)));
            }
            self.clamp_cursor();
        }
        self.mode = Mode::Navigate;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Navigate;
    }

    // -- reminders ----------------------------------------------------------

    /// One scanner tick. Fired reminders are saved right away and added to
    /// the reminder popup (appended if it is already open).
    pub fn scan_reminders(&mut self, now_stamp: &str) {
        let fired = self.store.fire_reminders(now_stamp);
        if fired.is_empty() {
            return;
        }
        self.save();
        self.reminders.extend(fired.iter().map(|r| r.message()));
    }

    pub fn dismiss_reminders(&mut self) {
        self.reminders.clear();
    }

    // -- search -------------------------------------------------------------

    /// Get the active search regex for highlighting.
    /// In Search mode: compiles from current input. Otherwise from last_search.
    pub fn active_search_re(&self) -> Option<Regex> {
        let pattern = match self.mode {
            Mode::Search => self.search_input.as_str(),
            _ => self.last_search.as_deref()?,
        };
        search::compile_pattern(pattern)
    }

    /// Move the cursor to the next (or previous) visible task matching the
    /// last search, wrapping around. `include_current` starts at the cursor.
    pub fn search_step(&mut self, forward: bool, include_current: bool) {
        let Some(re) = self.last_search.as_deref().and_then(search::compile_pattern) else {
            return;
        };
        let ids = search::matching_ids(self.store.tasks(), &re);
        let visible = self.visible_indices();
        let hits: Vec<usize> = visible
            .iter()
            .enumerate()
            .filter(|(_, i)| ids.contains(&self.store.tasks()[**i].id))
            .map(|(pos, _)| pos)
            .collect();

        let pattern = self.last_search.clone().unwrap_or_default();
        if hits.is_empty() {
            self.status = Some(Status::Info(format!("no matches for /{}", pattern)));
            return;
        }

        let cur = self.cursor;
        let next = if forward {
            hits.iter()
                .find(|&&p| if include_current { p >= cur } else { p > cur })
                .or_else(|| hits.first())
        } else {
            hits.iter()
                .rev()
                .find(|&&p| if include_current { p <= cur } else { p < cur })
                .or_else(|| hits.last())
        };
        if let Some(&pos) = next {
            self.cursor = pos;
        }
    }

    /// Adjust the scroll offset so the cursor row is inside a view of `height` rows
    pub fn ensure_cursor_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + height {
            self.scroll = self.cursor + 1 - height;
        }
    }
}

// ---------------------------------------------------------------------------
// UI state
// ---------------------------------------------------------------------------

/// Restore UI state from .tasklet-state.json
pub fn restore_ui_state(app: &mut App) {
    let ui_state = match read_ui_state(app.store.path()) {
        Some(s) => s,
        None => return,
    };

    if let Some(hide) = ui_state.hide_done {
        app.hide_done = hide;
    }
    if let Some(id) = ui_state.cursor_task {
        app.select_task(&id);
    }
    app.last_search = ui_state.last_search;
}

/// Save UI state to .tasklet-state.json
pub fn save_ui_state(app: &App) {
    let ui_state = UiState {
        cursor_task: app.cursor_task().map(|t| t.id.clone()),
        hide_done: Some(app.hide_done),
        last_search: app.last_search.clone(),
    };
    if let Err(e) = write_ui_state(app.store.path(), &ui_state) {
        tracing::debug!(error = %e, "could not write UI state");
    }
}

/// Run the TUI application
pub fn run(config: Config, data_file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let (store, load_error) = TaskStore::open(data_file);
    let mut app = App::new(store, &config, load_error);

    // Restore saved UI state
    restore_ui_state(&mut app);

    // Watch for writes from other tl processes. Not fatal if it cannot start.
    let watcher = match TaskFileWatcher::start(app.store.path()) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watcher unavailable");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&TaskFileWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if app.reminder_clock.is_due(Instant::now()) {
            app.scan_reminders(&reminder::local_now_stamp());
        }
        if let Some(w) = watcher
            && w.poll()
        {
            app.on_file_changed();
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
