use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::{AppConfig, Backend};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("backend = \"remote\" needs a [remote] table with url and anon_key")]
    MissingRemote,
}

/// Resolve the tasklist home directory.
///
/// Order: explicit override, `$TASKLIST_HOME`, `$XDG_DATA_HOME/tasklist`,
/// `~/.local/share/tasklist`.
pub fn resolve_home(override_dir: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("TASKLIST_HOME")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
    data_dir.join("tasklist")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

/// Read config.toml from the home directory. A missing file yields defaults.
pub fn read_config(home: &Path) -> Result<AppConfig, ConfigError> {
    let path = config_path(home);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    parse_config(&text)
}

pub fn parse_config(text: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(text)?;
    if config.backend == Backend::Remote && config.remote.is_none() {
        return Err(ConfigError::MissingRemote);
    }
    Ok(config)
}
