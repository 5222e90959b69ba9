//! Error types for script execution.

use thiserror::Error;

/// Errors that can occur while running a script.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The script raised an error while being evaluated.
    #[error("{0}")]
    Fault(String),

    /// Native evaluation was requested without the capability.
    #[error("native evaluation is disabled")]
    NativeEvalDisabled,

    /// The engine cannot handle the given language.
    #[error("language '{0}' is not supported by this engine")]
    UnsupportedLanguage(String),
}

impl ExecError {
    /// Create a script fault error.
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }

    /// Check if this error was raised by the script itself.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;
