//! Logging initialization.
//!
//! Logs go to a file in the platform log directory, or to stderr when
//! running verbose.

use playground_util::log::{self, LogConfig, LogLevel};
use std::path::PathBuf;

/// Initialize logging. Returns the log file path if logging to a file.
pub fn init_logging(verbose: bool, level: Option<LogLevel>) -> Option<PathBuf> {
    if verbose {
        let config = LogConfig {
            print: true,
            level: LogLevel::Debug,
            ..LogConfig::default()
        };
        if let Err(e) = log::init(config) {
            eprintln!("Warning: Could not initialize logging: {e}");
        }
        return None;
    }

    let log_file = get_log_dir().join("codeplayground.log");
    let config = LogConfig {
        level: level.unwrap_or_default(),
        file: Some(log_file.clone()),
        ..LogConfig::default()
    };
    match log::init(config) {
        Ok(()) => Some(log_file),
        Err(e) => {
            eprintln!("Warning: Could not open log file: {e}");
            None
        }
    }
}

/// Get the log directory path.
pub fn get_log_dir() -> PathBuf {
    playground_util::path::logs_dir().unwrap_or_else(|| PathBuf::from(".codeplayground/logs"))
}
