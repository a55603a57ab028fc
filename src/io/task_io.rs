use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::task::{Task, new_task_id};

/// Error type for data file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Render the whole collection as the on-disk JSON document.
pub fn serialize_tasks(tasks: &[Task]) -> Result<String, StoreError> {
    let mut content = serde_json::to_string_pretty(tasks)?;
    content.push('\n');
    Ok(content)
}

/// Replace the data file with the full collection.
///
/// The write goes through a temp file and a rename, so readers see either the
/// old or the new document. On failure the payload is kept in the recovery log.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    let content = serialize_tasks(tasks)?;
    if let Err(e) = recovery::atomic_write(path, content.as_bytes()) {
        tracing::warn!(path = %path.display(), error = %e, "save failed");
        recovery::log_recovery(
            path,
            RecoveryEntry {
                timestamp: chrono::Utc::now(),
                category: RecoveryCategory::Write,
                description: "task file write failed".to_string(),
                fields: vec![
                    ("Target".to_string(), path.display().to_string()),
                    ("Error".to_string(), e.to_string()),
                ],
                body: content,
            },
        );
        return Err(StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        });
    }
    tracing::debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}

/// Read the data file. A missing file is an empty collection; anything else
/// that goes wrong is returned to the caller.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, StoreError> {
    read_document(path).map(|doc| doc.tasks)
}

/// Tasks parsed from the data file
#[derive(Debug, Default)]
struct LoadedTasks {
    tasks: Vec<Task>,
    /// Entries that had no `id` and were given a fresh one
    ids_assigned: usize,
}

fn read_document(path: &Path) -> Result<LoadedTasks, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadedTasks::default()),
        Err(e) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    parse_tasks(path, &content)
}

fn parse_tasks(path: &Path, content: &str) -> Result<LoadedTasks, StoreError> {
    let mut tasks: Vec<Task> = serde_json::from_str(content).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let ids_assigned = assign_missing_ids(&mut tasks);
    Ok(LoadedTasks {
        tasks,
        ids_assigned,
    })
}

/// Give every task without an ID a fresh one. Returns how many were filled in.
fn assign_missing_ids(tasks: &mut [Task]) -> usize {
    let mut assigned = 0;
    for task in tasks.iter_mut().filter(|t| t.id.trim().is_empty()) {
        task.id = new_task_id();
        assigned += 1;
    }
    assigned
}

/// Load with the tolerant fallback: any failure yields an empty collection
/// plus the reason. Unparseable content is copied to the recovery log first,
/// since the next save will overwrite it.
///
/// IDs assigned to entries that had none are written back right away, so
/// the next load sees the same IDs.
pub fn load_or_empty(path: &Path) -> (Vec<Task>, Option<StoreError>) {
    match read_document(path) {
        Ok(doc) => {
            tracing::debug!(path = %path.display(), count = doc.tasks.len(), "loaded tasks");
            if doc.ids_assigned > 0 {
                match save_tasks(path, &doc.tasks) {
                    Ok(()) => tracing::info!(
                        path = %path.display(),
                        count = doc.ids_assigned,
                        "stored ids for tasks that had none"
                    ),
                    Err(e) => tracing::warn!(error = %e, "could not store assigned task ids"),
                }
            }
            (doc.tasks, None)
        }
        Err(err) => {
            tracing::warn!(error = %err, "falling back to an empty task list");
            if matches!(err, StoreError::Parse { .. })
                && let Ok(content) = fs::read_to_string(path)
            {
                recovery::log_recovery(
                    path,
                    RecoveryEntry {
                        timestamp: chrono::Utc::now(),
                        category: RecoveryCategory::Parse,
                        description: "task file unreadable, started empty".to_string(),
                        fields: vec![
                            ("Source".to_string(), path.display().to_string()),
                            ("Error".to_string(), err.to_string()),
                        ],
                        body: content,
                    },
                );
            }
            (Vec::new(), Some(err))
        }
    }
}
