//! Test fixtures for playground sessions.

use async_trait::async_trait;
use playground_core::{Bus, Notice, Persistence, Playground};
use playground_storage::json::storage_at;
use playground_storage::{JsonStorage, MemoryStorage, Storage, StorageError, StorageResult};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::broadcast;

/// A JSON store in a temporary data directory, removed on drop.
pub struct TestStore {
    temp_dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// The data directory (pass as `--data-dir`).
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A fresh handle on the store.
    pub fn storage(&self) -> JsonStorage {
        storage_at(self.path())
    }

    /// Raw JSON stored under a single-segment key.
    pub fn read_raw(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.storage().base_path().join(format!("{key}.json"));
        let text = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&text).ok()
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory storage that refuses writes to keys containing a marker,
/// the way a full disk or an overlong file name would.
pub struct RejectingStorage {
    inner: MemoryStorage,
    marker: String,
}

impl RejectingStorage {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            inner: MemoryStorage::new(),
            marker: marker.into(),
        }
    }

    /// The backing store, which accepts every write.
    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    fn rejects(&self, key: &[&str]) -> bool {
        key.iter().any(|part| part.contains(&self.marker))
    }
}

#[async_trait]
impl Storage for RejectingStorage {
    async fn read<T: DeserializeOwned + Send>(&self, key: &[&str]) -> StorageResult<Option<T>> {
        self.inner.read(key).await
    }

    async fn write<T: Serialize + Send + Sync>(&self, key: &[&str], value: &T) -> StorageResult<()> {
        if self.rejects(key) {
            return Err(StorageError::Io(std::io::Error::other("write refused")));
        }
        self.inner.write(key, value).await
    }

    async fn remove(&self, key: &[&str]) -> StorageResult<()> {
        self.inner.remove(key).await
    }
}

/// A playground with a notice subscription.
pub struct TestPlayground<S> {
    pub playground: Playground<S>,
    notices: broadcast::Receiver<Notice>,
}

impl TestPlayground<MemoryStorage> {
    /// An opened playground over a fresh in-memory store.
    pub async fn memory() -> Self {
        Self::open_with(Arc::new(MemoryStorage::new()), None).await
    }
}

impl TestPlayground<JsonStorage> {
    /// An opened playground over the JSON store in `store`.
    pub async fn json(store: &TestStore) -> Self {
        Self::open_with(Arc::new(store.storage()), None).await
    }
}

impl<S: Storage> TestPlayground<S> {
    /// Open a playground over `storage`, optionally on a shared id.
    pub async fn open_with(storage: Arc<S>, shared_id: Option<&str>) -> Self {
        let bus = Bus::new();
        let notices = bus.subscribe::<Notice>().await;
        let mut playground = Playground::new(Persistence::new(storage, bus.clone()), bus);
        playground
            .open(shared_id)
            .await
            .expect("Failed to open playground");
        Self {
            playground,
            notices,
        }
    }

    /// Notices published since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        let mut out = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            out.push(notice);
        }
        out
    }

    /// Titles of notices published since the last call.
    pub fn take_notice_titles(&mut self) -> Vec<String> {
        self.take_notices().into_iter().map(|n| n.title).collect()
    }
}
