use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// File name of the recovery log, kept next to the data file.
pub const RECOVERY_LOG_NAME: &str = ".tasklet-recovery.log";

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- tasklet recovery log: append-only
     Task data that could not be saved, or a data file that could not be
     read, is copied here before anything else touches it.
     Safe to delete once you have checked it. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// The data file could not be parsed and was replaced by an empty list
    Parse,
    /// A save failed; the body holds what would have been written
    Write,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parse => write!(f, "parse"),
            RecoveryCategory::Write => write!(f, "write"),
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

/// Return the path to the recovery log for a data file.
pub fn recovery_log_path(data_file: &Path) -> PathBuf {
    parent_dir(data_file).join(RECOVERY_LOG_NAME)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "## {} {}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));
        out.push('\n');

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry next to `data_file`. Errors are logged, never returned.
pub fn log_recovery(data_file: &Path, entry: RecoveryEntry) {
    let path = recovery_log_path(data_file);
    if let Err(e) = append_entry(&path, &entry) {
        tracing::warn!(path = %path.display(), error = %e, "could not write to recovery log");
    }
}

fn append_entry(path: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let needs_header = std::fs::metadata(path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entry(category: RecoveryCategory, body: &str) -> RecoveryEntry {
        RecoveryEntry {
            timestamp: DateTime::parse_from_rfc3339("2025-06-01T09:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            category,
            description: "tasks.json unreadable".into(),
            fields: vec![("Target".into(), "tasks.json".into())],
            body: body.into(),
        }
    }

    #[test]
    fn test_log_path_next_to_data_file() {
        assert_eq!(
            recovery_log_path(Path::new("data/tasks.json")),
            PathBuf::from("data/.tasklet-recovery.log")
        );
        assert_eq!(
            recovery_log_path(Path::new("tasks.json")),
            PathBuf::from("./.tasklet-recovery.log")
        );
    }

    #[test]
    fn test_entry_markdown() {
        let md = entry(RecoveryCategory::Parse, "[{ broken").to_markdown();
        assert!(md.starts_with("## 2025-06-01T09:00:00Z parse: tasks.json unreadable\n"));
        assert!(md.contains("Target: tasks.json\n"));
        assert!(md.contains("```text\n[{ broken\n```\n"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn test_header_written_once() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("tasks.json");
        log_recovery(&data, entry(RecoveryCategory::Write, "[]"));
        log_recovery(&data, entry(RecoveryCategory::Parse, "{"));

        let content = fs::read_to_string(recovery_log_path(&data)).unwrap();
        assert_eq!(content.matches("tasklet recovery log").count(), 1);
        assert_eq!(content.matches("## 2025-06-01T09:00:00Z").count(), 2);
        assert!(content.contains("write: "));
        assert!(content.contains("parse: "));
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        fs::write(&path, "old content that is longer").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
