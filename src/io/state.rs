use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the persisted TUI state, kept next to the data file.
pub const STATE_FILE_NAME: &str = ".tasklet-state.json";

/// Persisted TUI state
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// ID of the task under the cursor
    #[serde(default)]
    pub cursor_task: Option<String>,
    /// Done tasks hidden (None = use config default)
    #[serde(default)]
    pub hide_done: Option<bool>,
    /// Last search pattern
    #[serde(default)]
    pub last_search: Option<String>,
}

pub fn state_path(data_file: &Path) -> PathBuf {
    match data_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.join(STATE_FILE_NAME),
        _ => PathBuf::from(STATE_FILE_NAME),
    }
}

/// Read the state file for a data file. Missing or malformed state is None.
pub fn read_ui_state(data_file: &Path) -> Option<UiState> {
    let content = fs::read_to_string(state_path(data_file)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the state file for a data file
pub fn write_ui_state(data_file: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(state_path(data_file), content)
}
