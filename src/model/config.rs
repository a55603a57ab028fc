use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from tasklet.toml. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Data file, relative to the working directory
    #[serde(default = "default_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_file(),
        }
    }
}

fn default_file() -> String {
    "tasks.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Seconds between due-task scans
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Start with done tasks hidden
    #[serde(default)]
    pub hide_done: bool,
    /// Hex overrides for theme slots, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
