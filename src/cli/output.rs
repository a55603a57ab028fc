use serde::Serialize;

use crate::model::task::Task;
use crate::ops::reminder::Reminder;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based position in the file
    pub position: usize,
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub note: String,
    pub date: String,
    pub done: bool,
    pub notified: bool,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub id: String,
    pub position: usize,
}

#[derive(Serialize)]
pub struct ReminderJson {
    pub id: String,
    pub title: String,
    pub date: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn task_to_json(position: usize, task: &Task) -> TaskJson {
    TaskJson {
        position,
        id: task.id.clone(),
        title: task.title.clone(),
        note: task.note.clone(),
        date: task.date.clone(),
        done: task.done,
        notified: task.notified,
    }
}

pub fn reminder_to_json(reminder: &Reminder) -> ReminderJson {
    ReminderJson {
        id: reminder.id.clone(),
        title: reminder.title.clone(),
        date: reminder.date.clone(),
        message: reminder.message(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One `tl list` line: `  3 [x] 2025-06-01 09:00  Buy milk  (1a2b3c4d)`
pub fn format_task_line(position: usize, task: &Task) -> String {
    let check = if task.done { "[x]" } else { "[ ]" };
    format!(
        "{:>3} {} {:<16}  {}  ({})",
        position,
        check,
        task.date,
        task.title,
        task.short_id()
    )
}

/// `tl show` output: the list line followed by the indented note
pub fn format_task_detail(position: usize, task: &Task) -> Vec<String> {
    let mut lines = vec![format_task_line(position, task)];
    lines.push(format!("    id: {}", task.id));
    if task.notified {
        lines.push("    reminder: fired".to_string());
    }
    for line in task.note.lines() {
        lines.push(format!("    {}", line));
    }
    lines
}
