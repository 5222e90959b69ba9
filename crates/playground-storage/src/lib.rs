//! Storage layer for codeplayground.
//!
//! This crate provides the string-keyed key/value store that holds
//! autosave snapshots, version history, shared projects, and settings.
//! Two backends are available:
//! - JSON file storage (default, one file per key)
//! - In-memory storage (for tests and throwaway sessions)

pub mod error;
pub mod json;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use json::JsonStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// A trait for key-value storage backends.
///
/// Keys are represented as path segments, e.g. `["codeplayground_autosave"]`
/// or `["shared", "<uuid>"]`. Values are serialized/deserialized as JSON.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read a value from storage.
    ///
    /// Returns `None` if the key doesn't exist. A stored value that does not
    /// deserialize into `T` is reported as [`StorageError::Json`].
    async fn read<T: DeserializeOwned + Send>(&self, key: &[&str]) -> StorageResult<Option<T>>;

    /// Write a value to storage, replacing any previous value.
    async fn write<T: Serialize + Send + Sync>(&self, key: &[&str], value: &T)
        -> StorageResult<()>;

    /// Remove a value from storage. Removing a missing key is not an error.
    async fn remove(&self, key: &[&str]) -> StorageResult<()>;
}
