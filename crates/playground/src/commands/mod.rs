//! Command handlers for the codeplayground CLI.
//!
//! This module contains handlers for the various CLI subcommands,
//! split into logical groups.

pub mod config;
pub mod context;
pub mod files;
pub mod logging;
pub mod prefs;
pub mod session;
pub mod shell;
pub mod transfer;

pub use config::*;
pub use context::*;
pub use files::*;
pub use logging::*;
pub use prefs::*;
pub use session::*;
pub use shell::*;
pub use transfer::*;
