//! Shared utilities for codeplayground.
//!
//! This crate provides common utilities used across the workspace:
//! - Error handling patterns
//! - ULID-based identifier generation
//! - Logging setup with tracing
//! - Platform directories for config, data and logs

pub mod error;
pub mod id;
pub mod log;
pub mod path;

pub use error::{Error, ErrorKind, Result};
pub use id::{IdPrefix, Identifier};
