use std::ops::Range;

use regex::Regex;

use crate::model::task::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Note,
    Date,
}

/// A search hit for one field of one task
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub task_id: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Compile a user pattern case-insensitively. A pattern that is not a valid
/// regex is searched for literally.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search title, note and date of every task, in collection order.
pub fn search_tasks(tasks: &[Task], re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for task in tasks {
        let fields = [
            (MatchField::Title, task.title.as_str()),
            (MatchField::Note, task.note.as_str()),
            (MatchField::Date, task.date.as_str()),
        ];
        for (field, text) in fields {
            let spans = find_matches(re, text);
            if !spans.is_empty() {
                hits.push(SearchHit {
                    task_id: task.id.clone(),
                    field,
                    spans,
                });
            }
        }
    }
    hits
}

/// IDs of tasks with at least one hit, deduplicated, in collection order
pub fn matching_ids(tasks: &[Task], re: &Regex) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for hit in search_tasks(tasks, re) {
        if ids.last() != Some(&hit.task_id) {
            ids.push(hit.task_id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("Buy milk".into(), "semi-skimmed".into(), "2025-06-01".into()),
            Task::new("Call mum".into(), "about the milk".into(), "2025-06-02 18:00".into()),
            Task::new("Dentist".into(), String::new(), "2025-06-03 09:30".into()),
        ]
    }

    #[test]
    fn test_case_insensitive_title_and_note() {
        let tasks = tasks();
        let re = compile_pattern("MILK").unwrap();
        let hits = search_tasks(&tasks, &re);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].field, MatchField::Title);
        assert_eq!(hits[0].spans, vec![4..8]);
        assert_eq!(hits[1].field, MatchField::Note);
        assert_eq!(hits[1].task_id, tasks[1].id);
    }

    #[test]
    fn test_date_field() {
        let tasks = tasks();
        let re = compile_pattern("06-03").unwrap();
        assert_eq!(matching_ids(&tasks, &re), vec![tasks[2].id.clone()]);
    }

    #[test]
    fn test_invalid_regex_falls_back_to_literal() {
        let mut tasks = tasks();
        tasks[2].title = "Dentist (9:30".into();
        let re = compile_pattern("(9:30").unwrap();
        assert_eq!(matching_ids(&tasks, &re), vec![tasks[2].id.clone()]);
    }

    #[test]
    fn test_matching_ids_dedup() {
        let mut tasks = tasks();
        tasks[0].note = "milk milk".into();
        let re = compile_pattern("milk").unwrap();
        assert_eq!(
            matching_ids(&tasks, &re),
            vec![tasks[0].id.clone(), tasks[1].id.clone()]
        );
    }

    #[test]
    fn test_empty_pattern() {
        assert!(compile_pattern("").is_none());
    }
}
