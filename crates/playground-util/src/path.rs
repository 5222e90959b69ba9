//! Platform directories.
//!
//! All locations follow the XDG conventions through the `dirs` crate.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "codeplayground";

/// Get the codeplayground configuration directory.
///
/// - `$XDG_CONFIG_HOME/codeplayground` if set
/// - `~/.config/codeplayground` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Get the codeplayground data directory.
///
/// This is where the JSON key/value store lives.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_DIR))
}

/// Get the codeplayground logs directory.
pub fn logs_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|p| p.join(APP_DIR).join("logs"))
}

/// Resolve the data directory, preferring an explicit override.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => data_dir().ok_or_else(|| Error::not_found("could not determine data directory")),
    }
}
