use std::path::{Path, PathBuf};

use crate::io::task_io::{self, StoreError};
use crate::model::task::Task;
use crate::ops::reminder::{self, Reminder};
use crate::ops::task_ops;

/// The ordered task collection together with the file it mirrors.
///
/// Single writer: front-ends mutate through `&mut TaskStore` and call
/// `save()` after every mutation.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// An empty store bound to `path`. Nothing is read.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore {
            path: path.into(),
            tasks: Vec::new(),
        }
    }

    /// Load the store from `path`. Any load failure leaves the store empty;
    /// the reason comes back alongside it.
    pub fn open(path: impl Into<PathBuf>) -> (Self, Option<StoreError>) {
        let path = path.into();
        let (tasks, err) = task_io::load_or_empty(&path);
        (TaskStore { path, tasks }, err)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        task_ops::find_task(&self.tasks, id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        task_ops::position(&self.tasks, id)
    }

    // -- mutations ----------------------------------------------------------

    pub fn add(&mut self, title: &str, note: &str, date: &str) -> Option<String> {
        task_ops::add_task(&mut self.tasks, title, note, date)
    }

    pub fn delete_at(&mut self, index: usize) -> Option<Task> {
        task_ops::delete_at(&mut self.tasks, index)
    }

    pub fn edit_at(&mut self, index: usize, new_title: &str, new_note: &str) -> bool {
        task_ops::edit_at(&mut self.tasks, index, new_title, new_note)
    }

    pub fn set_done(&mut self, id: &str, done: bool) -> bool {
        task_ops::set_done(&mut self.tasks, id, done)
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        task_ops::remove(&mut self.tasks, id)
    }

    pub fn mark_notified(&mut self, id: &str) -> bool {
        match task_ops::find_task_mut(&mut self.tasks, id) {
            Some(task) => {
                task.notified = true;
                true
            }
            None => false,
        }
    }

    pub fn due_unnotified<'a>(&'a self, now_stamp: &'a str) -> impl Iterator<Item = &'a Task> {
        task_ops::due_unnotified(&self.tasks, now_stamp)
    }

    /// Run one scanner tick. Fired tasks are marked notified; the caller saves.
    pub fn fire_reminders(&mut self, now_stamp: &str) -> Vec<Reminder> {
        reminder::fire_due(&mut self.tasks, now_stamp)
    }

    // -- persistence --------------------------------------------------------

    pub fn save(&self) -> Result<(), StoreError> {
        task_io::save_tasks(&self.path, &self.tasks)
    }

    /// Replace the collection with what is on disk (no merge). On failure the
    /// collection becomes empty, as with `open`.
    pub fn reload(&mut self) -> Option<StoreError> {
        let (tasks, err) = task_io::load_or_empty(&self.path);
        self.tasks = tasks;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> TaskStore {
        TaskStore::new(tmp.path().join("tasks.json"))
    }

    #[test]
    fn test_buy_milk_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        let id = store.add("Buy milk", "", "2025-06-01 09:00").unwrap();
        store.save().unwrap();

        let (loaded, err) = TaskStore::open(store.path().to_path_buf());
        assert!(err.is_none());
        assert_eq!(loaded.len(), 1);
        let task = &loaded.tasks()[0];
        assert_eq!(task.id, id);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.note, "");
        assert_eq!(task.date, "2025-06-01 09:00");
        assert!(!task.done);
        assert!(!task.notified);
    }

    #[test]
    fn test_flags_survive_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        let id = store.add("Call", "mum", "2025-06-01 18:00").unwrap();
        store.set_done(&id, true);
        store.mark_notified(&id);
        store.save().unwrap();

        let (loaded, _) = TaskStore::open(store.path().to_path_buf());
        assert_eq!(loaded.tasks(), store.tasks());
    }

    #[test]
    fn test_delete_first_of_two() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("one", "", "2025-06-01");
        let second = store.add("two", "", "2025-06-02").unwrap();
        store.delete_at(0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].id, second);
        assert_eq!(store.position(&second), Some(0));
    }

    #[test]
    fn test_scanner_scenario() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        let id = store.add("Buy milk", "", "2025-06-01 09:00").unwrap();

        let fired = store.fire_reminders("2025-06-01 09:00");
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert!(store.get(&id).unwrap().notified);
        store.save().unwrap();

        assert!(store.fire_reminders("2025-06-01 09:00").is_empty());
        assert_eq!(store.due_unnotified("2025-06-01 09:00").count(), 0);

        // notified state is persisted
        let (loaded, _) = TaskStore::open(store.path().to_path_buf());
        assert!(loaded.get(&id).unwrap().notified);
    }

    #[test]
    fn test_open_corrupt_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, "definitely not json").unwrap();
        let (store, err) = TaskStore::open(path);
        assert!(store.is_empty());
        assert!(matches!(err, Some(StoreError::Parse { .. })));
    }

    #[test]
    fn test_reload_replaces_wholesale() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("saved", "", "2025-06-01");
        store.save().unwrap();
        store.add("unsaved", "", "2025-06-01");
        assert_eq!(store.len(), 2);

        assert!(store.reload().is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "saved");
    }

    #[test]
    fn test_unknown_id_operations_are_noops() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("one", "", "2025-06-01");
        let before = store.tasks().to_vec();
        assert!(!store.set_done("nope", true));
        assert!(store.remove("nope").is_none());
        assert!(!store.mark_notified("nope"));
        assert!(!store.edit_at(3, "x", "y"));
        assert!(store.delete_at(3).is_none());
        assert_eq!(store.tasks(), before.as_slice());
    }
}
