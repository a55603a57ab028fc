use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};

use crate::model::task::{STAMP_FORMAT, Task};
use crate::ops::task_ops;

/// A reminder raised for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub date: String,
}

impl Reminder {
    /// Alert text shown to the user
    pub fn message(&self) -> String {
        format!("Task due: {}", self.title)
    }
}

/// Wall-clock time truncated to the minute, in the stored date format
pub fn now_stamp(now: &NaiveDateTime) -> String {
    now.format(STAMP_FORMAT).to_string()
}

/// Stamp for the current local minute
pub fn local_now_stamp() -> String {
    now_stamp(&Local::now().naive_local())
}

/// Fire every due, pending, un-notified task at `now_stamp`.
///
/// Each fired task is marked notified so it can never fire again. A task
/// whose minute passed without a scan stays pending forever; there is no
/// catch-up. Callers persist the collection when the result is non-empty.
pub fn fire_due(tasks: &mut [Task], now_stamp: &str) -> Vec<Reminder> {
    let due_ids: Vec<String> = task_ops::due_unnotified(tasks, now_stamp)
        .map(|t| t.id.clone())
        .collect();

    let mut fired = Vec::with_capacity(due_ids.len());
    for id in due_ids {
        if let Some(task) = task_ops::find_task_mut(tasks, &id) {
            task.notified = true;
            tracing::info!(task = %task.short_id(), date = %task.date, "reminder fired");
            fired.push(Reminder {
                id: task.id.clone(),
                title: task.title.clone(),
                date: task.date.clone(),
            });
        }
    }
    fired
}

/// Fixed-interval scan timer. The first check is always due so a scan
/// happens at startup.
#[derive(Debug, Clone)]
pub struct ReminderClock {
    interval: Duration,
    last: Option<Instant>,
}

impl ReminderClock {
    pub fn new(interval: Duration) -> Self {
        ReminderClock {
            interval: interval.max(Duration::from_secs(1)),
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a scan should run now; records the scan time when it does.
    pub fn is_due(&mut self, now: Instant) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tasks_due_at(date: &str) -> Vec<Task> {
        let mut tasks = Vec::new();
        task_ops::add_task(&mut tasks, "Buy milk", "", date);
        tasks
    }

    #[test]
    fn test_now_stamp_truncates_to_minute() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 59)
            .unwrap();
        assert_eq!(now_stamp(&now), "2025-06-01 09:00");
    }

    #[test]
    fn test_fires_once_then_stays_quiet() {
        let mut tasks = tasks_due_at("2025-06-01 09:00");

        let fired = fire_due(&mut tasks, "2025-06-01 09:00");
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].title, "Buy milk");
        assert_eq!(fired[0].message(), "Task due: Buy milk");
        assert!(tasks[0].notified);

        let again = fire_due(&mut tasks, "2025-06-01 09:00");
        assert!(again.is_empty());
    }

    #[test]
    fn test_no_catch_up_after_missed_minute() {
        let mut tasks = tasks_due_at("2025-06-01 09:00");
        assert!(fire_due(&mut tasks, "2025-06-01 08:59").is_empty());
        assert!(fire_due(&mut tasks, "2025-06-01 09:01").is_empty());
        assert!(!tasks[0].notified);
    }

    #[test]
    fn test_done_tasks_never_fire() {
        let mut tasks = tasks_due_at("2025-06-01 09:00");
        tasks[0].done = true;
        assert!(fire_due(&mut tasks, "2025-06-01 09:00").is_empty());
        assert!(!tasks[0].notified);
    }

    #[test]
    fn test_date_only_task_never_fires() {
        let mut tasks = tasks_due_at("2025-06-01");
        assert!(fire_due(&mut tasks, "2025-06-01 00:00").is_empty());
    }

    #[test]
    fn test_fires_in_collection_order() {
        let mut tasks = Vec::new();
        task_ops::add_task(&mut tasks, "a", "", "2025-06-01 09:00");
        task_ops::add_task(&mut tasks, "b", "", "2025-06-02 09:00");
        task_ops::add_task(&mut tasks, "c", "", "2025-06-01 09:00");
        let titles: Vec<String> = fire_due(&mut tasks, "2025-06-01 09:00")
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["a", "c"]);
        assert!(!tasks[1].notified);
    }

    #[test]
    fn test_clock_first_check_is_due() {
        let mut clock = ReminderClock::new(Duration::from_secs(60));
        let start = Instant::now();
        assert!(clock.is_due(start));
        assert!(!clock.is_due(start + Duration::from_secs(30)));
        assert!(clock.is_due(start + Duration::from_secs(60)));
        assert!(!clock.is_due(start + Duration::from_secs(61)));
    }

    #[test]
    fn test_clock_interval_floor() {
        let clock = ReminderClock::new(Duration::ZERO);
        assert_eq!(clock.interval(), Duration::from_secs(1));
    }
}
