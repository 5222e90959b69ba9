//! Error types for the core crate.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Project import error.
    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] playground_storage::StorageError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The operation needs a logged-in user.
    #[error("login required")]
    LoginRequired,

    /// Username is empty or cannot be used in a storage key.
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    /// The operation needs a shared project.
    #[error("not in shared mode")]
    NotShared,

    /// No snapshot is stored under the shared id.
    #[error("shared project not found: {0}")]
    SharedProjectNotFound(String),

    /// No version at the given history index.
    #[error("no saved version at index {0}")]
    VersionNotFound(usize),

    /// No node at the given path.
    #[error("no file or folder at {0}")]
    PathNotFound(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON/JSONC syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// Environment variable not found during substitution.
    #[error("environment variable not found: {name}")]
    EnvVarNotFound { name: String },

    /// File reference not found during substitution.
    #[error("file reference not found: {path}")]
    FileRefNotFound { path: String },
}

/// Project import errors. Current state is never touched when one occurs.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document is not valid JSON.
    #[error("invalid project file format: {0}")]
    Parse(String),

    /// The document has no `files` entry.
    #[error("project file has no files")]
    MissingFiles,
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_wraps() {
        let err: CoreError = ImportError::MissingFiles.into();
        assert_eq!(err.to_string(), "import failed: project file has no files");
    }

    #[test]
    fn test_config_error_wraps() {
        let err: CoreError = ConfigError::EnvVarNotFound {
            name: "TOKEN".to_string(),
        }
        .into();
        assert!(err.to_string().contains("TOKEN"));
    }
}
