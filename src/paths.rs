//! XDG directory helpers for config/data locations.

use std::path::PathBuf;

/// Base directory for persistent data (snapshots, logs).
///
/// Uses `UPKEEP_DATA_DIR` if set, otherwise `$XDG_DATA_HOME/upkeep` or
/// `~/.local/share/upkeep`.
pub(crate) fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("UPKEEP_DATA_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local")
                .join("share")
        })
        .join("upkeep")
}

/// Base directory for configuration files.
///
/// Uses `UPKEEP_CONFIG_DIR` if set, otherwise `$XDG_CONFIG_HOME/upkeep` or
/// `~/.config/upkeep`.
pub(crate) fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("UPKEEP_CONFIG_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".config")
        })
        .join("upkeep")
}

/// Default state snapshot path.
pub fn snapshot_path() -> PathBuf {
    data_dir().join("store.json")
}

/// Default log directory.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}
