use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The data file was created, modified, renamed over or removed.
    Changed,
}

/// Watches the directory holding the data file.
///
/// Saves go through a temp file and a rename, so the directory is watched
/// rather than the file itself.
pub struct TaskFileWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl TaskFileWatcher {
    /// Start watching `data_file`. Call `poll()` each tick.
    pub fn start(data_file: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir = match data_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = data_file.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };
                if !is_relevant_kind(&event.kind) {
                    return;
                }
                let touches_data_file = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if touches_data_file {
                    let _ = tx.send(FileEvent::Changed);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(TaskFileWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. True when at least one change arrived since the
    /// last call; bursts collapse into one.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(FileEvent::Changed) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}

fn is_relevant_kind(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn test_relevant_kinds() {
        assert!(is_relevant_kind(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant_kind(&EventKind::Modify(ModifyKind::Any)));
        assert!(!is_relevant_kind(&EventKind::Access(AccessKind::Any)));
    }
}
