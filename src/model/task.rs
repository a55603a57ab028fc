use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format of a date-only due value (`2025-06-01`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format of a minute-resolution due value (`2025-06-01 09:00`)
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Format of the time part entered on its own (`09:00`)
pub const TIME_FORMAT: &str = "%H:%M";

/// Characters of the ID shown in lists and accepted as a short selector
pub const SHORT_ID_LEN: usize = 8;

/// Generate a fresh task ID (32 lowercase hex chars).
pub fn new_task_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// A single to-do entry as stored in the data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identity. Empty when the file has none; the loader assigns
    /// one and writes it back.
    #[serde(default)]
    pub id: String,
    /// Short label. Older files stored it under `text`.
    #[serde(alias = "text")]
    pub title: String,
    /// Free text, empty when absent
    #[serde(default)]
    pub note: String,
    /// `YYYY-MM-DD` or `YYYY-MM-DD HH:MM`, kept verbatim
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub done: bool,
    /// Set once the due reminder has fired
    #[serde(default)]
    pub notified: bool,
}

impl Task {
    /// Create a pending task with a fresh ID
    pub fn new(title: String, note: String, date: String) -> Self {
        Task {
            id: new_task_id(),
            title,
            note,
            date,
            done: false,
            notified: false,
        }
    }

    /// Parsed due value, if the stored date string is well-formed
    pub fn due(&self) -> Option<Due> {
        Due::parse(&self.date)
    }

    /// First characters of the ID, enough to tell tasks apart on screen
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(SHORT_ID_LEN)
            .map_or(self.id.len(), |(i, _)| i);
        &self.id[..end]
    }
}

/// A parsed due value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    /// Whole day, no reminder minute
    Day(NaiveDate),
    /// A specific minute
    Minute(NaiveDateTime),
}

impl Due {
    /// Parse either accepted format. Surrounding whitespace is not accepted.
    pub fn parse(s: &str) -> Option<Due> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, STAMP_FORMAT) {
            // chrono accepts single-digit fields; require the canonical form
            if dt.format(STAMP_FORMAT).to_string() == s {
                return Some(Due::Minute(dt));
            }
            return None;
        }
        match NaiveDate::parse_from_str(s, DATE_FORMAT) {
            Ok(d) if d.format(DATE_FORMAT).to_string() == s => Some(Due::Day(d)),
            _ => None,
        }
    }
}

impl fmt::Display for Due {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Due::Day(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Due::Minute(dt) => write!(f, "{}", dt.format(STAMP_FORMAT)),
        }
    }
}
