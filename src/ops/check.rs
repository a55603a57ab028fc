use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::task::{Due, Task};

/// Structured result from `tl check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// Something that should be fixed. `position` is 1-based, as in `tl list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    #[serde(rename = "empty_title")]
    EmptyTitle { position: usize, task_id: String },
    /// Neither `YYYY-MM-DD` nor `YYYY-MM-DD HH:MM`, or an impossible day
    #[serde(rename = "invalid_date")]
    InvalidDate {
        position: usize,
        task_id: String,
        date: String,
    },
    #[serde(rename = "duplicate_id")]
    DuplicateId {
        task_id: String,
        positions: Vec<usize>,
    },
}

/// A non-critical inconsistency in the reminder flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Date-only tasks have no minute to fire at
    #[serde(rename = "notified_without_time")]
    NotifiedWithoutTime { position: usize, task_id: String },
    /// The reminder can only fire at the due minute, not before it
    #[serde(rename = "notified_before_due")]
    NotifiedBeforeDue {
        position: usize,
        task_id: String,
        date: String,
    },
}

/// Validate a task collection against the wall-clock minute `now`.
///
/// Read-only; nothing is repaired.
pub fn check_tasks(tasks: &[Task], now: NaiveDateTime) -> CheckResult {
    let mut result = CheckResult::default();

    for (task_id, positions) in find_duplicate_ids(tasks) {
        result
            .errors
            .push(CheckError::DuplicateId { task_id, positions });
    }

    for (i, task) in tasks.iter().enumerate() {
        check_task(task, i + 1, now, &mut result);
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_task(task: &Task, position: usize, now: NaiveDateTime, result: &mut CheckResult) {
    let task_id = task.short_id().to_string();

    if task.title.trim().is_empty() {
        result.errors.push(CheckError::EmptyTitle {
            position,
            task_id: task_id.clone(),
        });
    }

    match task.due() {
        None => result.errors.push(CheckError::InvalidDate {
            position,
            task_id,
            date: task.date.clone(),
        }),
        Some(Due::Day(_)) if task.notified => {
            result
                .warnings
                .push(CheckWarning::NotifiedWithoutTime { position, task_id });
        }
        Some(Due::Minute(due)) if task.notified && due > now => {
            result.warnings.push(CheckWarning::NotifiedBeforeDue {
                position,
                task_id,
                date: task.date.clone(),
            });
        }
        Some(_) => {}
    }
}

/// IDs that appear more than once, with their 1-based positions, in first-seen order
fn find_duplicate_ids(tasks: &[Task]) -> Vec<(String, Vec<usize>)> {
    let mut order: Vec<&str> = Vec::new();
    let mut locations: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, task) in tasks.iter().enumerate() {
        let entry = locations.entry(task.id.as_str()).or_default();
        if entry.is_empty() {
            order.push(task.id.as_str());
        }
        entry.push(i + 1);
    }
    order
        .into_iter()
        .filter_map(|id| {
            let positions = locations.remove(id)?;
            (positions.len() > 1).then(|| (id.to_string(), positions))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn task(title: &str, date: &str) -> Task {
        Task::new(title.into(), String::new(), date.into())
    }

    #[test]
    fn test_clean_collection_is_valid() {
        let mut fired = task("fired", "2025-06-01 09:00");
        fired.notified = true;
        let tasks = vec![task("a", "2025-06-01"), fired];
        let result = check_tasks(&tasks, now());
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_title_and_bad_date() {
        let tasks = vec![task("  ", "2025-06-01"), task("b", "next week")];
        let result = check_tasks(&tasks, now());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            result.errors[0],
            CheckError::EmptyTitle { position: 1, .. }
        ));
        assert!(matches!(
            &result.errors[1],
            CheckError::InvalidDate { position: 2, date, .. } if date == "next week"
        ));
    }

    #[test]
    fn test_duplicate_ids() {
        let a = task("a", "2025-06-01");
        let mut b = task("b", "2025-06-01");
        b.id = a.id.clone();
        let tasks = vec![a.clone(), task("c", "2025-06-01"), b];
        let result = check_tasks(&tasks, now());
        assert_eq!(
            result.errors,
            vec![CheckError::DuplicateId {
                task_id: a.id,
                positions: vec![1, 3],
            }]
        );
    }

    #[test]
    fn test_notified_warnings() {
        let mut day_only = task("day", "2025-06-01");
        day_only.notified = true;
        let mut early = task("early", "2025-06-02 09:00");
        early.notified = true;
        let result = check_tasks(&[day_only, early], now());
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(matches!(
            result.warnings[0],
            CheckWarning::NotifiedWithoutTime { position: 1, .. }
        ));
        assert!(matches!(
            result.warnings[1],
            CheckWarning::NotifiedBeforeDue { position: 2, .. }
        ));
    }

    #[test]
    fn test_json_shape() {
        let tasks = vec![task("b", "soon")];
        let result = check_tasks(&tasks, now());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0]["type"], "invalid_date");
        assert_eq!(json["errors"][0]["position"], 1);
    }
}
