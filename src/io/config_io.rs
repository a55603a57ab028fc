use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "tasklet.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Parse config text
pub fn parse_config(path: &Path, text: &str) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `tasklet.toml` in `cwd` is used
/// when present, otherwise the defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_NAME);
            if !candidate.exists() {
                return Ok(Config::default());
            }
            candidate
        }
    };
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config = parse_config(&path, &text)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Pick the data file: command line / environment first, then config.
/// Relative paths are taken from `cwd`.
pub fn resolve_data_file(cli_file: Option<&Path>, config: &Config, cwd: &Path) -> PathBuf {
    let chosen = cli_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.store.file));
    if chosen.is_absolute() {
        chosen
    } else {
        cwd.join(chosen)
    }
}
