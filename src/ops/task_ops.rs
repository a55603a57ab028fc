use chrono::{Duration, Local, NaiveDate, NaiveTime};

use crate::model::task::{DATE_FORMAT, STAMP_FORMAT, TIME_FORMAT, Task};

/// Input rejected before it reaches the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("enter a task title")]
    EmptyTitle,
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),
    #[error("no such day: {year:04}-{month:02}-{day:02}")]
    NoSuchDay { year: i32, month: u32, day: u32 },
}

// ---------------------------------------------------------------------------
// Mutations
//
// All of these are tolerant: a bad index or unknown ID is a no-op, reported
// through the return value rather than an error.
// ---------------------------------------------------------------------------

/// Append a pending task. Returns the new ID, or None when the title is blank.
pub fn add_task(tasks: &mut Vec<Task>, title: &str, note: &str, date: &str) -> Option<String> {
    if title.trim().is_empty() {
        return None;
    }
    let task = Task::new(title.to_string(), note.to_string(), date.to_string());
    let id = task.id.clone();
    tasks.push(task);
    Some(id)
}

/// Remove the task at `index`, if there is one
pub fn delete_at(tasks: &mut Vec<Task>, index: usize) -> Option<Task> {
    if index < tasks.len() {
        Some(tasks.remove(index))
    } else {
        None
    }
}

/// Replace title and note of the task at `index`. Date and flags are untouched.
pub fn edit_at(tasks: &mut [Task], index: usize, new_title: &str, new_note: &str) -> bool {
    match tasks.get_mut(index) {
        Some(task) => {
            task.title = new_title.to_string();
            task.note = new_note.to_string();
            true
        }
        None => false,
    }
}

/// Set the done flag to the caller's value (e.g. a checkbox state)
pub fn set_done(tasks: &mut [Task], id: &str, done: bool) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) => {
            task.done = done;
            true
        }
        None => false,
    }
}

/// Remove a task by ID
pub fn remove(tasks: &mut Vec<Task>, id: &str) -> Option<Task> {
    let index = position(tasks, id)?;
    Some(tasks.remove(index))
}

/// Pending, un-notified tasks whose date string equals `now_stamp` exactly
pub fn due_unnotified<'a>(tasks: &'a [Task], now_stamp: &'a str) -> impl Iterator<Item = &'a Task> {
    tasks
        .iter()
        .filter(move |t| !t.done && !t.notified && t.date == now_stamp)
}

pub fn position(tasks: &[Task], id: &str) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Trimmed title, or an error when nothing is left
pub fn validate_title(title: &str) -> Result<&str, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(trimmed)
    }
}

/// Parse a `YYYY-MM-DD` field, telling malformed input apart from impossible days
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let s = input.trim();
    let parts: Vec<&str> = s.split('-').collect();
    let bad = || ValidationError::InvalidDate(s.to_string());
    if parts.len() != 3
        || parts[0].len() != 4
        || parts[1].len() != 2
        || parts[2].len() != 2
        || !parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(bad());
    }
    let year: i32 = parts[0].parse().map_err(|_| bad())?;
    let month: u32 = parts[1].parse().map_err(|_| bad())?;
    let day: u32 = parts[2].parse().map_err(|_| bad())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ValidationError::NoSuchDay { year, month, day })
}

/// Parse an `HH:MM` field
pub fn parse_time(input: &str) -> Result<NaiveTime, ValidationError> {
    let s = input.trim();
    match NaiveTime::parse_from_str(s, TIME_FORMAT) {
        Ok(t) if t.format(TIME_FORMAT).to_string() == s => Ok(t),
        _ => Err(ValidationError::InvalidTime(s.to_string())),
    }
}

/// Build the stored date string from a date field and an optional time field.
/// A blank time yields a date-only value.
pub fn compose_date(date: &str, time: Option<&str>) -> Result<String, ValidationError> {
    let day = parse_date(date)?;
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => {
            let time = parse_time(t)?;
            Ok(day.and_time(time).format(STAMP_FORMAT).to_string())
        }
        None => Ok(day.format(DATE_FORMAT).to_string()),
    }
}

/// Today's date in the stored format
pub fn today_str() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Step a date field by whole days. Unparseable input starts from today.
pub fn step_date(input: &str, days: i64) -> String {
    let base = parse_date(input).unwrap_or_else(|_| Local::now().date_naive());
    (base + Duration::days(days)).format(DATE_FORMAT).to_string()
}

/// Step a time field by minutes, wrapping around midnight.
/// An empty or unparseable field starts from the current minute.
pub fn step_time(input: &str, minutes: i64) -> String {
    let base = parse_time(input).unwrap_or_else(|_| {
        let now = Local::now().time();
        NaiveTime::parse_from_str(&now.format(TIME_FORMAT).to_string(), TIME_FORMAT)
            .unwrap_or(NaiveTime::MIN)
    });
    let (stepped, _) = base.overflowing_add_signed(Duration::minutes(minutes));
    stepped.format(TIME_FORMAT).to_string()
}
